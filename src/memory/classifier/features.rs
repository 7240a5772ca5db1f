// src/memory/classifier/features.rs

//! Lexical cue scanning over raw text.
//!
//! Single responsibility: count cue occurrences per category. No scoring,
//! no policy, no side effects — the classifier turns counts into a decision.

use serde::{Deserialize, Serialize};

/// Occurrence counts per cue category. Counts are signed only so that the
/// classifier can treat out-of-band negative values as zero; the extractor
/// itself never produces negatives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureCounts {
    pub temporal: i32,
    pub emotional: i32,
    pub conversational: i32,
    pub factual: i32,
    pub profile: i32,
}

impl FeatureCounts {
    pub fn is_empty(&self) -> bool {
        *self == FeatureCounts::default()
    }
}

/// The five cue lexicons, one keyword list per category. Matching is
/// case-sensitive substring matching, so keywords are stems ("기쁘" matches
/// 기쁘다/기쁘고/기쁜…). Passed into the extractor explicitly so tests can
/// swap in a deterministic table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CueTable {
    pub temporal: Vec<String>,
    pub emotional: Vec<String>,
    pub conversational: Vec<String>,
    pub factual: Vec<String>,
    pub profile: Vec<String>,
}

fn keywords(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for CueTable {
    fn default() -> Self {
        Self {
            temporal: keywords(&[
                "오늘", "어제", "내일", "지금", "현재", "방금", "아까", "나중에", "아침",
                "점심", "저녁", "월요일", "화요일", "수요일", "목요일", "금요일", "토요일",
                "일요일", "최근", "이전", "전에", "후에", "동안",
            ]),
            emotional: keywords(&[
                "기쁘", "행복", "즐거", "신나", "좋", "만족", "감사", "슬프", "우울",
                "힘들", "아프", "괴로", "답답", "속상", "화나", "짜증", "분노", "열받",
                "스트레스", "불안", "걱정", "두려", "무서", "긴장", "초조", "피곤",
                "지치", "재밌", "웃겨", "놀라", "신기",
            ]),
            conversational: keywords(&[
                "말했", "얘기했", "대화했", "이야기했", "물어봤", "답했", "라고", "다고",
                "냐고", "거든", "잖아", "ㅋㅋ", "ㅎㅎ", "ㅠㅠ", "ㅜㅜ", "?", "!",
            ]),
            factual: keywords(&[
                "이다", "입니다", "됩니다", "정보", "사실", "지식", "개념", "정의",
                "설명", "문법", "규칙", "역사", "과학", "수학", "기술", "정치", "경제",
            ]),
            profile: keywords(&[
                "생일", "나이", "직업", "취미", "좋아하", "싫어하", "전공", "거주",
                "주소", "가족", "부모", "형제", "자매", "이름", "성격", "특징", "습관",
                "버릇", "취향", "전화", "연락", "메일", "계정",
            ]),
        }
    }
}

/// Scans text for cue keywords. Pure and total: empty text yields all-zero
/// counts, a keyword occurring N times counts N (non-overlapping).
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    cues: CueTable,
}

impl FeatureExtractor {
    pub fn new(cues: CueTable) -> Self {
        Self { cues }
    }

    pub fn extract(&self, text: &str) -> FeatureCounts {
        FeatureCounts {
            temporal: count_matches(text, &self.cues.temporal),
            emotional: count_matches(text, &self.cues.emotional),
            conversational: count_matches(text, &self.cues.conversational),
            factual: count_matches(text, &self.cues.factual),
            profile: count_matches(text, &self.cues.profile),
        }
    }
}

fn count_matches(text: &str, keywords: &[String]) -> i32 {
    keywords
        .iter()
        .filter(|kw| !kw.is_empty())
        .map(|kw| text.matches(kw.as_str()).count())
        .sum::<usize>() as i32
}
