//! Persisted Record（メモリファイル）の形式
//!
//! `[{"human": "..."}, {"ai": "..."}, ...]` の時系列配列。バージョンやメタデータは持たない。
//! 書き出しは 4 スペースインデント。読み込みは未知の要素を読み飛ばす。

use crate::domain::Turn;
use common::error::Error;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

const HUMAN_KEY: &str = "human";
const AI_KEY: &str = "ai";

/// ファイル上の 1 要素（単一キーのオブジェクト）
#[derive(Debug, Serialize)]
enum RecordEntry<'a> {
    #[serde(rename = "human")]
    Human(&'a str),
    #[serde(rename = "ai")]
    Ai(&'a str),
}

impl<'a> From<&'a Turn> for RecordEntry<'a> {
    fn from(turn: &'a Turn) -> Self {
        match turn {
            Turn::Human(text) => RecordEntry::Human(text),
            Turn::Assistant(text) => RecordEntry::Ai(text),
        }
    }
}

/// 読み込み結果（未知の要素を読み飛ばした件数付き）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRecord {
    pub turns: Vec<Turn>,
    pub skipped: usize,
}

/// 発言列をファイル内容に変換する
pub fn encode(turns: &[Turn]) -> Result<String, Error> {
    let entries: Vec<RecordEntry<'_>> = turns.iter().map(RecordEntry::from).collect();
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    entries
        .serialize(&mut ser)
        .map_err(|e| Error::json(format!("Failed to serialize memory: {}", e)))?;
    String::from_utf8(buf).map_err(|e| Error::json(format!("Failed to serialize memory: {}", e)))
}

/// ファイル内容を発言列に変換する
///
/// 配列でなければ Err（Error::Json）。要素は `human` を先に見て、無ければ `ai` を見る。
/// 値が文字列でない要素・どちらのキーも無い要素は skipped に数えて捨てる。
pub fn decode(text: &str) -> Result<DecodedRecord, Error> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| Error::json(format!("Invalid memory JSON: {}", e)))?;
    let Value::Array(items) = value else {
        return Err(Error::json("Invalid memory JSON: expected an array"));
    };

    let mut turns = Vec::with_capacity(items.len());
    let mut skipped = 0;
    for item in &items {
        match entry_to_turn(item) {
            Some(turn) => turns.push(turn),
            None => skipped += 1,
        }
    }
    Ok(DecodedRecord { turns, skipped })
}

fn entry_to_turn(item: &Value) -> Option<Turn> {
    let obj = item.as_object()?;
    if let Some(v) = obj.get(HUMAN_KEY) {
        return v.as_str().map(Turn::human);
    }
    obj.get(AI_KEY)?.as_str().map(Turn::assistant)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let json = encode(&[Turn::human("hi"), Turn::assistant("hello")]).unwrap();
        assert_eq!(
            json,
            "[\n    {\n        \"human\": \"hi\"\n    },\n    {\n        \"ai\": \"hello\"\n    }\n]"
        );
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_decode_roundtrip_with_special_characters() {
        let turns = vec![
            Turn::human("line1\nline2 \"quoted\""),
            Turn::assistant("日本語もそのまま 🦀"),
            Turn::human(""),
        ];
        let decoded = decode(&encode(&turns).unwrap()).unwrap();
        assert_eq!(decoded.turns, turns);
        assert_eq!(decoded.skipped, 0);
    }

    #[test]
    fn test_decode_skips_unknown_entries() {
        let text = r#"[
            {"human": "q1"},
            {"system": "ignored"},
            {"ai": 42},
            "not an object",
            {"ai": "a1", "extra": true},
            {"human": "q2", "ai": "ignored because human wins"}
        ]"#;
        let decoded = decode(text).unwrap();
        assert_eq!(
            decoded.turns,
            vec![
                Turn::human("q1"),
                Turn::assistant("a1"),
                Turn::human("q2"),
            ]
        );
        assert_eq!(decoded.skipped, 3);
    }

    #[test]
    fn test_decode_rejects_non_array() {
        assert!(matches!(decode(r#"{"human": "x"}"#), Err(Error::Json(_))));
        assert!(matches!(decode("not json"), Err(Error::Json(_))));
        assert!(matches!(decode(""), Err(Error::Json(_))));
    }
}
