use rs_tagscrape::{cut, level_of, levels, split, CutOptions, Item, Keep, Options, SplitMode, SplitOptions};

const THREE_LEVELS: &str = "<div>a<div>b<div>c</div></div></div>";

fn describe(items: &[Item<'_>]) -> Vec<String> {
    items
        .iter()
        .map(|item| match item {
            Item::Text(text) => format!("text:{text}"),
            Item::Tag(tag) if tag.is_close() => format!("/{}@{}", tag.name, tag.level),
            Item::Tag(tag) => format!("{}@{}", tag.name, tag.level),
        })
        .collect()
}

#[test]
fn keep_above_excludes_target_level_and_deeper() {
    let options = Options::default();
    let cut_options = CutOptions { level: Some(1), keep: Keep::ABOVE, ..CutOptions::default() };
    let items: Vec<_> = cut(THREE_LEVELS, &options, cut_options).collect();
    assert_eq!(describe(&items), ["div@0", "/div@0"]);
}

#[test]
fn keep_same_returns_only_target_level() {
    let options = Options::default();
    let cut_options = CutOptions { level: Some(1), keep: Keep::SAME, ..CutOptions::default() };
    let items: Vec<_> = cut(THREE_LEVELS, &options, cut_options).collect();
    assert_eq!(describe(&items), ["text:a", "div@1", "/div@1"]);
}

#[test]
fn keep_same_and_below() {
    let options = Options::default();
    let cut_options = CutOptions { level: Some(1), keep: Keep::SAME | Keep::BELOW, text: false, ..CutOptions::default() };
    let items: Vec<_> = cut(THREE_LEVELS, &options, cut_options).collect();
    assert_eq!(describe(&items), ["div@1", "div@2", "/div@2", "/div@1"]);
}

#[test]
fn split_rows_into_blocks() {
    let options = Options::default();
    let html = "<table><tr><td>1</td></tr><tr><td>2</td></tr></table>";
    let split_options = SplitOptions { tags: vec!["tr".into()], strip: true, ..SplitOptions::default() };
    let rows: Vec<_> = split(html, &options, split_options).collect();
    assert_eq!(rows, ["<tr><td>1</td></tr>", "<tr><td>2</td></tr>"]);
}

#[test]
fn split_blocks_concatenate_to_input() {
    let options = Options::default();
    let html = "intro<div>a</div>between<div>b</div>outro";
    let blocks: Vec<_> = split(html, &options, SplitOptions::default()).collect();
    assert_eq!(blocks.concat(), html);
    assert_eq!(blocks, ["intro", "<div>a</div>", "between", "<div>b</div>", "outro"]);
}

#[test]
fn split_tag_only_lists_delimiters() {
    let options = Options::default();
    let html = "<div id=1>a</div><div id=2>b</div>";
    let split_options = SplitOptions { mode: SplitMode::TagOnly, ..SplitOptions::default() };
    let tags: Vec<_> = split(html, &options, split_options).collect();
    assert_eq!(tags, ["<div id=1>", "<div id=2>"]);
}

#[test]
fn levels_are_sorted_and_distinct() {
    let options = Options::default();
    let html = "<table><tr><td><table><tr><td>x</td></tr></table></td></tr></table><table></table>";
    assert_eq!(levels(html, &options, &["table"]), [0, 3]);
    assert_eq!(level_of(html, &options, &["TD"]), Some(2));
    assert_eq!(level_of(html, &options, &["form"]), None);
}
