//! Evidence chunk construction from a parsed [`PatentRecord`].

use patent_core::chunk::{EvidenceChunk, SectionType};
use patent_core::record::PatentRecord;
use patent_core::text::split_with_overlap;

const MAX_CHARS: usize = 1200;
const OVERLAP: usize = 150;

/// `prefix.upper()` matches some `cpc_code.upper()` prefix.
#[must_use]
pub fn has_cpc_prefix(patent: &PatentRecord, prefix: &str) -> bool {
    patent.has_cpc_prefix(prefix)
}

/// Build the full set of evidence chunks for one patent: one per claim, one
/// for the abstract (if non-empty), and overlap-split pieces for every
/// summary and description paragraph.
///
/// `para_id` is `{section}_{paragraph_index}_{piece_index}`, both indices
/// 1-based (`"summary_1_1"`, `"description_2_1"`).
#[must_use]
pub fn build_chunks(patent: &PatentRecord) -> Vec<EvidenceChunk> {
    let mut chunks = Vec::new();

    for claim in &patent.claims {
        let chunk = EvidenceChunk::new(
            &patent.publication_number,
            SectionType::Claim,
            &claim.claim_num,
            &claim.text,
        )
        .with_claim(&claim.claim_num, claim.is_dependent);
        chunks.push(chunk);
    }

    if !patent.abstract_text.is_empty() {
        chunks.push(
            EvidenceChunk::new(
                &patent.publication_number,
                SectionType::Abstract,
                "abstract",
                &patent.abstract_text,
            )
            .with_para_id("abstract_0"),
        );
    }

    push_section_chunks(
        &mut chunks,
        patent,
        SectionType::Summary,
        "summary",
        &patent.summary_paragraphs,
    );
    push_section_chunks(
        &mut chunks,
        patent,
        SectionType::Description,
        "description",
        &patent.description_paragraphs,
    );

    chunks
}

fn push_section_chunks(
    chunks: &mut Vec<EvidenceChunk>,
    patent: &PatentRecord,
    section_type: SectionType,
    section_prefix: &str,
    paragraphs: &[String],
) {
    for (para_idx, para) in paragraphs.iter().enumerate() {
        for (piece_idx, piece) in split_with_overlap(para, MAX_CHARS, OVERLAP).into_iter().enumerate() {
            let para_id = format!("{section_prefix}_{}_{}", para_idx + 1, piece_idx + 1);
            chunks.push(
                EvidenceChunk::new(&patent.publication_number, section_type, &para_id, &piece)
                    .with_para_id(para_id.clone()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use patent_core::chunk::SectionType;
    use patent_core::record::Claim;
    use pretty_assertions::assert_eq;

    use super::*;

    fn fixture() -> PatentRecord {
        PatentRecord {
            publication_number: "US1234567B2".to_string(),
            grant_date: None,
            title: "A Widget".to_string(),
            abstract_text: "A widget for doing things.".to_string(),
            summary_paragraphs: vec!["Summary paragraph one.".to_string()],
            description_paragraphs: vec!["Description paragraph one.".to_string()],
            claims: vec![
                Claim {
                    claim_num: "1".to_string(),
                    text: "A widget comprising a frame.".to_string(),
                    is_dependent: false,
                    depends_on: Vec::new(),
                },
                Claim {
                    claim_num: "2".to_string(),
                    text: "The widget of claim 1, wherein the frame is metal.".to_string(),
                    is_dependent: true,
                    depends_on: vec!["1".to_string()],
                },
            ],
            cpc_codes: vec!["G06F17/30".to_string()],
            citations: Vec::new(),
            raw: BTreeMap::new(),
        }
    }

    #[test]
    fn yields_one_chunk_per_claim_plus_abstract_plus_paragraphs() {
        let chunks = build_chunks(&fixture());
        assert_eq!(chunks.len(), 4);
        let claim_chunks: Vec<_> = chunks
            .iter()
            .filter(|c| c.section_type == SectionType::Claim)
            .collect();
        assert_eq!(claim_chunks.len(), 2);
        assert_eq!(claim_chunks[0].is_dependent, Some(false));
        assert_eq!(claim_chunks[1].is_dependent, Some(true));
    }

    #[test]
    fn chunk_ids_are_pairwise_unique() {
        let chunks = build_chunks(&fixture());
        let mut ids: Vec<_> = chunks.iter().map(|c| c.chunk_id.clone()).collect();
        let before = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), before);
    }

    #[test]
    fn abstract_chunk_present_only_when_non_empty() {
        let mut patent = fixture();
        patent.abstract_text = String::new();
        let chunks = build_chunks(&patent);
        assert!(!chunks.iter().any(|c| c.section_type == SectionType::Abstract));
    }

    #[test]
    fn para_ids_follow_the_section_paragraph_piece_scheme() {
        let chunks = build_chunks(&fixture());
        let summary = chunks
            .iter()
            .find(|c| c.section_type == SectionType::Summary)
            .unwrap();
        assert_eq!(summary.para_id.as_deref(), Some("summary_1_1"));
    }

    #[test]
    fn has_cpc_prefix_delegates_to_core() {
        assert!(has_cpc_prefix(&fixture(), "G06F"));
        assert!(!has_cpc_prefix(&fixture(), "H04L"));
    }
}
