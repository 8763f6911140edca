//! Traditional/simplified script conversion for lyric display.
//!
//! The table is a bijection over the characters it covers, so converting
//! forward and then backward restores the original text byte for byte.
//! Characters outside the table pass through unchanged. The conversion always
//! produces a new string; cached songs are never rewritten in place.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Per-song display variant. Reset to `Original` whenever a new song is picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptVariant {
    #[default]
    Original,
    Simplified,
}

impl ScriptVariant {
    pub fn toggled(self) -> Self {
        match self {
            ScriptVariant::Original => ScriptVariant::Simplified,
            ScriptVariant::Simplified => ScriptVariant::Original,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScriptVariant::Original => "original",
            ScriptVariant::Simplified => "simplified",
        }
    }

    pub fn apply(self, text: &str) -> String {
        match self {
            ScriptVariant::Original => text.to_string(),
            ScriptVariant::Simplified => to_simplified(text),
        }
    }
}

/// (traditional, simplified) pairs common in song lyrics. One-to-one only;
/// the round-trip tests below depend on that.
const PAIRS: &[(char, char)] = &[
    ('愛', '爱'),
    ('風', '风'),
    ('飛', '飞'),
    ('雲', '云'),
    ('夢', '梦'),
    ('淚', '泪'),
    ('聽', '听'),
    ('說', '说'),
    ('話', '话'),
    ('語', '语'),
    ('讓', '让'),
    ('這', '这'),
    ('邊', '边'),
    ('過', '过'),
    ('還', '还'),
    ('遠', '远'),
    ('遲', '迟'),
    ('陽', '阳'),
    ('時', '时'),
    ('間', '间'),
    ('開', '开'),
    ('關', '关'),
    ('門', '门'),
    ('問', '问'),
    ('閃', '闪'),
    ('憶', '忆'),
    ('記', '记'),
    ('詩', '诗'),
    ('書', '书'),
    ('畫', '画'),
    ('點', '点'),
    ('燈', '灯'),
    ('熱', '热'),
    ('歲', '岁'),
    ('華', '华'),
    ('萬', '万'),
    ('與', '与'),
    ('無', '无'),
    ('為', '为'),
    ('鳥', '鸟'),
    ('馬', '马'),
    ('魚', '鱼'),
    ('長', '长'),
    ('發', '发'),
    ('變', '变'),
    ('離', '离'),
    ('難', '难'),
    ('雙', '双'),
    ('歡', '欢'),
    ('樂', '乐'),
    ('傷', '伤'),
    ('斷', '断'),
    ('續', '续'),
    ('紅', '红'),
    ('綠', '绿'),
    ('藍', '蓝'),
    ('顏', '颜'),
    ('靜', '静'),
    ('誰', '谁'),
    ('們', '们'),
    ('來', '来'),
    ('對', '对'),
    ('錯', '错'),
    ('見', '见'),
    ('覺', '觉'),
    ('戀', '恋'),
    ('終', '终'),
    ('結', '结'),
    ('緣', '缘'),
    ('線', '线'),
    ('牽', '牵'),
    ('擁', '拥'),
    ('溫', '温'),
    ('願', '愿'),
    ('幾', '几'),
    ('傘', '伞'),
];

static TO_SIMPLIFIED: Lazy<HashMap<char, char>> =
    Lazy::new(|| PAIRS.iter().copied().collect());

static TO_TRADITIONAL: Lazy<HashMap<char, char>> =
    Lazy::new(|| PAIRS.iter().map(|&(t, s)| (s, t)).collect());

pub fn to_simplified(text: &str) -> String {
    text.chars()
        .map(|c| *TO_SIMPLIFIED.get(&c).unwrap_or(&c))
        .collect()
}

#[allow(dead_code)]
pub fn to_traditional(text: &str) -> String {
    text.chars()
        .map(|c| *TO_TRADITIONAL.get(&c).unwrap_or(&c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_bijective() {
        assert_eq!(TO_SIMPLIFIED.len(), PAIRS.len());
        assert_eq!(TO_TRADITIONAL.len(), PAIRS.len());
    }

    #[test]
    fn converts_known_characters() {
        assert_eq!(to_simplified("我愛這首歌"), "我爱这首歌");
        assert_eq!(to_traditional("我爱这首歌"), "我愛這首歌");
    }

    #[test]
    fn round_trip_restores_original() {
        let original = "聽風說夢，淚點燈。Hello 123";
        assert_eq!(to_traditional(&to_simplified(original)), original);
    }

    #[test]
    fn unmapped_text_passes_through() {
        assert_eq!(to_simplified("plain ascii"), "plain ascii");
        assert_eq!(to_simplified("我你他"), "我你他");
    }

    #[test]
    fn toggle_is_reversible() {
        let v = ScriptVariant::default();
        assert_eq!(v.toggled().toggled(), v);
        assert_eq!(v.apply("愛"), "愛");
        assert_eq!(v.toggled().apply("愛"), "爱");
    }
}
