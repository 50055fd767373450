use rs_tagscrape::{build_tree, iterate, Item, Node, NodeKind, NodeQuery, Options, TagKind};

#[derive(Debug, PartialEq, Eq)]
enum Event {
    Open(String, usize),
    Close(String, usize),
    Text(String),
}

fn tree_events(node: &Node, depth: usize, out: &mut Vec<Event>) {
    match &node.kind {
        NodeKind::Root => node.children.iter().for_each(|c| tree_events(c, depth, out)),
        NodeKind::Text { content } => out.push(Event::Text(content.clone())),
        NodeKind::Element { name, .. } => {
            out.push(Event::Open(name.clone(), depth));
            node.children.iter().for_each(|c| tree_events(c, depth + 1, out));
            out.push(Event::Close(name.clone(), depth));
        }
    }
}

fn scan_events(html: &str, options: &Options) -> Vec<Event> {
    iterate(html, options)
        .map(|item| match item {
            Item::Text(text) => Event::Text(text.to_string()),
            Item::Tag(tag) if tag.kind == TagKind::Close => Event::Close(tag.name.to_string(), tag.level),
            Item::Tag(tag) => Event::Open(tag.name.to_string(), tag.level),
        })
        .collect()
}

#[test]
fn well_formed_input_round_trips_through_the_tree() {
    let options = Options::default();
    let html = "<html><body><div>a<div>b</div>c<table><tr><td>d</td></tr></table></div>e</body></html>";
    let root = build_tree(html, &options);

    let mut from_tree = Vec::new();
    tree_events(&root, 0, &mut from_tree);
    assert_eq!(from_tree, scan_events(html, &options));
}

#[test]
fn depth_follows_accounting_nesting() {
    let options = Options::default();
    let root = build_tree("<div><div><div>deep</div></div></div>", &options);
    let mut depth = 0;
    let mut node = &root;
    while let Some(child) = node.children.iter().find(|c| c.is_element()) {
        depth += 1;
        node = child;
    }
    assert_eq!(depth, 3);
    assert_eq!(node.text(), "deep");
}

#[test]
fn unclosed_tags_keep_their_text() {
    let options = Options::default();
    let html = "<div><p>text";
    let texts: Vec<_> = iterate(html, &options).filter_map(|i| i.as_text()).collect();
    assert_eq!(texts, ["text"]);
    let root = build_tree(html, &options);
    assert_eq!(root.text(), "text");
}

#[test]
fn find_all_collects_links_in_order() {
    let options = Options::default();
    let html = r#"<div><a href="/1">one</a><div><a href="/2">two</a></div></div><a name=x>anchor</a>"#;
    let root = build_tree(html, &options);
    let hrefs: Vec<_> = root
        .find_all(&NodeQuery::name("a").with_attr("href", None))
        .into_iter()
        .filter_map(|n| n.attributes().and_then(|a| a.value("href")))
        .collect();
    assert_eq!(hrefs, ["/1", "/2"]);
}

#[test]
fn query_accepts_several_names() {
    let options = Options::default();
    let root = build_tree("<table><tr><th>h</th><td>d</td></tr></table>", &options);
    let cells = root.find_all(&NodeQuery::name("th").or_name("td"));
    assert_eq!(cells.len(), 2);
}

#[test]
fn tree_serializes_to_json() {
    let options = Options::default();
    let root = build_tree("<div id=a>x</div>", &options);
    let json = serde_json::to_value(&root).unwrap();
    assert_eq!(json["kind"]["type"], "root");
    let div = &json["children"][0];
    assert_eq!(div["kind"]["name"], "div");
    assert_eq!(div["kind"]["attributes"]["id"], "a");
    assert_eq!(div["children"][0]["kind"]["content"], "x");
    assert_eq!(div["index"], 0);
}

#[test]
fn alternate_accounting_changes_shape() {
    let html = "<ul><li>a</li><li>b</li></ul>";
    let flat = build_tree(html, &Options::default());
    assert_eq!(flat.children.len(), 3);

    let nested = build_tree(html, &Options::with_level_accounting(["ul", "li"]));
    assert_eq!(nested.children.len(), 1);
    let ul = &nested.children[0];
    assert_eq!(ul.children.len(), 2);
    assert_eq!(ul.children[1].text(), "b");
}
