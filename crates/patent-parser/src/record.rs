//! Namespace-agnostic extraction of [`PatentRecord`]s from a PTGRXML byte
//! stream. See the module docs in [`crate`] for the overall shape.

use std::sync::LazyLock;

use patent_core::record::{Claim, PatentRecord};
use patent_core::text::normalize;
use regex::Regex;

use crate::error::ParseError;
use crate::xmltree::{parse_forest, Node};

static DEPENDENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:claim|claims)\s+(\d+)").unwrap());

/// Parse every `us-patent-grant` document found in `xml_bytes`, whether the
/// stream is a single root, several roots concatenated back to back, or one
/// root enclosing several grants.
pub fn parse_patent_xml(xml_bytes: &[u8]) -> Result<Vec<PatentRecord>, ParseError> {
    let forest = parse_forest(xml_bytes)?;
    let mut docs = Vec::new();
    for root in &forest {
        if root.name == "us-patent-grant" {
            docs.push(root);
        } else {
            docs.extend(root.find_all_vec("us-patent-grant"));
        }
    }

    Ok(docs.into_iter().filter_map(extract_one).collect())
}

fn extract_one(doc: &Node) -> Option<PatentRecord> {
    let publication_number = normalize(
        &doc.findtext_path(&["publication-reference", "document-id", "doc-number"])
            .unwrap_or_default(),
    );
    if publication_number.is_empty() {
        return None;
    }

    let title = normalize(&doc.findtext_path(&["invention-title"]).unwrap_or_default());
    let grant_date = doc
        .findtext_path(&["publication-reference", "document-id", "date"])
        .map(|s| normalize(&s))
        .filter(|s| !s.is_empty());

    let abstract_text = normalize(&join_paragraphs(collect_paragraphs(doc, &["abstract"])));

    let summary_nodes = collect_paragraphs(doc, &["summary", "summary-of-invention"]);
    let summary_paragraphs: Vec<String> = summary_nodes
        .iter()
        .map(|p| normalize(&p.text_joined()))
        .filter(|s| !s.is_empty())
        .collect();

    let summary_ptrs: Vec<*const Node> = summary_nodes.iter().map(|p| *p as *const Node).collect();
    let description_paragraphs: Vec<String> = collect_paragraphs(doc, &["description", "detailed-description"])
        .into_iter()
        .filter(|p| !summary_ptrs.contains(&(*p as *const Node)))
        .map(|p| normalize(&p.text_joined()))
        .filter(|s| !s.is_empty())
        .collect();

    let cpc_codes = doc
        .find_all_vec("classification-cpc-text")
        .into_iter()
        .map(|n| normalize(&n.text_joined()))
        .filter(|s| !s.is_empty())
        .collect();

    let citations = doc
        .find_all_vec("references-cited")
        .into_iter()
        .flat_map(|refs| refs.find_all_vec("doc-number"))
        .map(|n| normalize(&n.text_joined()))
        .filter(|s| !s.is_empty())
        .collect();

    let claims = extract_claims(doc);

    let mut raw = std::collections::BTreeMap::new();
    raw.insert("publication_number".to_string(), publication_number.clone());
    raw.insert("title".to_string(), title.clone());

    Some(PatentRecord {
        publication_number,
        grant_date,
        title,
        abstract_text,
        summary_paragraphs,
        description_paragraphs,
        claims,
        cpc_codes,
        citations,
        raw,
    })
}

/// `<p>` descendants under every node whose local name is one of `container_names`.
fn collect_paragraphs<'a>(doc: &'a Node, container_names: &[&str]) -> Vec<&'a Node> {
    let mut out = Vec::new();
    for container in find_any_named(doc, container_names) {
        container.find_all("p", &mut out);
    }
    out
}

fn find_any_named<'a>(doc: &'a Node, names: &[&str]) -> Vec<&'a Node> {
    let mut out = Vec::new();
    find_any_named_rec(doc, names, &mut out);
    out
}

fn find_any_named_rec<'a>(node: &'a Node, names: &[&str], out: &mut Vec<&'a Node>) {
    for child in &node.children {
        if names.contains(&child.name.as_str()) {
            out.push(child);
        }
        find_any_named_rec(child, names, out);
    }
}

fn join_paragraphs(paragraphs: Vec<&Node>) -> String {
    paragraphs
        .iter()
        .map(|p| p.text_joined())
        .collect::<Vec<_>>()
        .join(" ")
}

fn extract_claims(doc: &Node) -> Vec<Claim> {
    let mut claims = Vec::new();
    for claims_container in find_any_named(doc, &["claims"]) {
        for (idx, claim_node) in claims_container
            .children
            .iter()
            .filter(|c| c.name == "claim")
            .enumerate()
        {
            let claim_texts = claim_node.find_all_vec("claim-text");
            let raw_text = if claim_texts.is_empty() {
                claim_node.text_joined()
            } else {
                claim_texts
                    .iter()
                    .map(|n| n.text_joined())
                    .collect::<Vec<_>>()
                    .join(" ")
            };
            let text = normalize(&raw_text);

            let claim_num = claim_node
                .attr("num")
                .map(ToString::to_string)
                .filter(|s| !s.is_empty())
                .or_else(|| {
                    claim_node
                        .find_first("claim-num")
                        .map(Node::text_joined)
                        .map(|s| normalize(&s))
                        .filter(|s| !s.is_empty())
                })
                .unwrap_or_else(|| (idx + 1).to_string());

            let depends_on: Vec<String> = DEPENDENCY_RE
                .captures_iter(&text)
                .map(|c| c[1].to_string())
                .collect();
            let is_dependent = DEPENDENCY_RE.is_match(&text);

            claims.push(Claim {
                claim_num,
                text,
                is_dependent,
                depends_on,
            });
        }
    }
    claims
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SAMPLE: &str = r#"
        <us-patent-grant>
          <us-bibliographic-data-grant>
            <publication-reference>
              <document-id><date>20240213</date><doc-number>US1234567B2</doc-number></document-id>
            </publication-reference>
            <invention-title>A Widget</invention-title>
            <classifications-cpc>
              <main-cpc><classification-cpc><classification-cpc-text>G06F17/30</classification-cpc-text></classification-cpc></main-cpc>
            </classifications-cpc>
            <references-cited>
              <citation><patcit><document-id><doc-number>US7654321</doc-number></document-id></patcit></citation>
            </references-cited>
          </us-bibliographic-data-grant>
          <abstract><p>A widget for doing things.</p></abstract>
          <description>
            <summary><p>Summary paragraph one.</p></summary>
            <p>Description paragraph one.</p>
          </description>
          <claims>
            <claim num="1"><claim-text>1. A widget comprising a frame.</claim-text></claim>
            <claim num="2"><claim-text>2. The widget of claim 1, wherein the frame is metal.</claim-text></claim>
          </claims>
        </us-patent-grant>
    "#;

    #[test]
    fn extracts_core_fields() {
        let patents = parse_patent_xml(SAMPLE.as_bytes()).unwrap();
        assert_eq!(patents.len(), 1);
        let p = &patents[0];
        assert_eq!(p.publication_number, "US1234567B2");
        assert_eq!(p.grant_date.as_deref(), Some("20240213"));
        assert_eq!(p.title, "A Widget");
        assert_eq!(p.abstract_text, "A widget for doing things.");
        assert_eq!(p.cpc_codes, vec!["G06F17/30"]);
        assert_eq!(p.citations, vec!["US7654321"]);
    }

    #[test]
    fn summary_and_description_are_disjoint() {
        let patents = parse_patent_xml(SAMPLE.as_bytes()).unwrap();
        let p = &patents[0];
        assert_eq!(p.summary_paragraphs, vec!["Summary paragraph one."]);
        assert_eq!(p.description_paragraphs, vec!["Description paragraph one."]);
    }

    #[test]
    fn claims_have_dependency_classification() {
        let patents = parse_patent_xml(SAMPLE.as_bytes()).unwrap();
        let claims = &patents[0].claims;
        assert_eq!(claims.len(), 2);
        assert!(!claims[0].is_dependent);
        assert!(claims[0].depends_on.is_empty());
        assert!(claims[1].is_dependent);
        assert_eq!(claims[1].depends_on, vec!["1"]);
    }

    #[test]
    fn missing_publication_number_is_skipped() {
        let xml = b"<us-patent-grant><invention-title>No id</invention-title></us-patent-grant>";
        assert!(parse_patent_xml(xml).unwrap().is_empty());
    }

    #[test]
    fn enclosing_root_with_multiple_grants_is_supported() {
        let xml = format!("<grants>{SAMPLE}{SAMPLE}</grants>");
        let patents = parse_patent_xml(xml.as_bytes()).unwrap();
        assert_eq!(patents.len(), 2);
    }

    #[test]
    fn concatenated_roots_without_enclosing_element_are_supported() {
        let xml = format!("{SAMPLE}{SAMPLE}");
        let patents = parse_patent_xml(xml.as_bytes()).unwrap();
        assert_eq!(patents.len(), 2);
    }

    #[test]
    fn malformed_xml_is_a_parse_error() {
        let xml = b"<us-patent-grant><!-- unterminated";
        assert!(parse_patent_xml(xml).is_err());
    }
}
