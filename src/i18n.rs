#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    En,
    Ja,
}

impl Lang {
    /// Lenient BCP-47-ish parsing: "ja", "ja-JP" etc. select Japanese,
    /// everything else falls back to English.
    pub fn from_tag(tag: &str) -> Lang {
        if tag.to_ascii_lowercase().starts_with("ja") {
            Lang::Ja
        } else {
            Lang::En
        }
    }
}

// key, english, japanese
const STRINGS: &[(&str, &str, &str)] = &[
    ("Title", "Title", "タイトル"),
    ("URL", "URL", "URL"),
    ("Note", "Note", "メモ"),
    ("Tags", "Tags", "タグ"),
    ("Path", "Path", "保存先"),
    ("delete", "Delete", "削除"),
    ("Submit", "Submit", "保存"),
    ("Submitting", "Submitting", "保存中"),
    ("selectPath", "Select a folder", "フォルダを選択"),
    ("tagTips", "Add tags", "タグを追加"),
    ("memoryText", "Why is this page worth keeping?", "このページについてのメモ"),
    ("syncDelete", "Also remove entries with this URL", "同じURLの項目も削除"),
    ("Please input the title!", "Please input the title!", "タイトルを入力してください"),
    ("Please input the URL!", "Please input the URL!", "URLを入力してください"),
    ("Please input the description!", "Please input the description!", "メモを入力してください"),
];

/// Localized string for a form label or message. Unknown keys come back
/// verbatim so a missing entry degrades to the key, not a blank label.
pub fn text<'a>(lang: Lang, key: &'a str) -> &'a str {
    match STRINGS.iter().find(|(k, _, _)| *k == key) {
        Some((_, en, ja)) => match lang {
            Lang::En => en,
            Lang::Ja => ja,
        },
        None => key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_keys_resolve_per_language() {
        assert_eq!(text(Lang::En, "delete"), "Delete");
        assert_eq!(text(Lang::Ja, "delete"), "削除");
        assert_eq!(text(Lang::Ja, "Title"), "タイトル");
    }

    #[test]
    fn unknown_key_comes_back_verbatim() {
        assert_eq!(text(Lang::En, "no-such-key"), "no-such-key");
    }

    #[test]
    fn tag_parsing_is_lenient() {
        assert_eq!(Lang::from_tag("ja"), Lang::Ja);
        assert_eq!(Lang::from_tag("ja-JP"), Lang::Ja);
        assert_eq!(Lang::from_tag("en-US"), Lang::En);
        assert_eq!(Lang::from_tag(""), Lang::En);
    }
}
