//! Form recovery and form submission helpers.
//!
//! `extract_forms` does not use the tag iterator. It jumps straight from one
//! form-related tag start to the next with a regex and runs a small state
//! machine over them, so inputs survive however broken the surrounding markup
//! is. Nesting is ignored entirely: an input belongs to the last `<form>` seen.

#![allow(clippy::expect_used)]

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use url::Url;

use crate::attributes::{parse_attributes, Attributes};
use crate::entities;
use crate::error::{Error, Result};
use crate::options::DEFAULT_FORM_TAGS;
use crate::patterns::{form_tag_pattern, FORM_DATA};
use crate::Options;

static TEXTAREA_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</textarea").expect("TEXTAREA_CLOSE regex"));

/// Width of a value cell in the text summary.
const CELL_WIDTH: usize = 20;

/// A recovered form.
///
/// `inputs` keeps the attributes of every `input`, `select` and `textarea` in
/// document order; `select` and `textarea` entries carry a synthetic `type`.
/// `values` is separate from `inputs`: it starts out with the document
/// defaults and is the only thing the filling methods touch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Form {
    pub name: String,
    /// `action` attribute with entities expanded.
    pub action: Option<String>,
    pub inputs: Vec<Attributes>,
    pub values: BTreeMap<String, String>,
}

fn is_submit(input: &Attributes) -> bool {
    input.value("type").is_some_and(|t| t.eq_ignore_ascii_case("submit"))
}

fn name_matches(input: &Attributes, pattern: Option<&Regex>) -> bool {
    match pattern {
        None => true,
        Some(re) => input
            .value("name")
            .and_then(|name| re.find(name))
            .is_some_and(|m| m.start() == 0),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn cell(value: &str) -> String {
    if value.chars().count() > CELL_WIDTH {
        let kept: String = value.chars().take(CELL_WIDTH - 3).collect();
        format!("{kept}...")
    } else {
        value.to_string()
    }
}

impl Form {
    #[must_use]
    pub fn new(name: &str, action: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            action,
            inputs: Vec::new(),
            values: BTreeMap::new(),
        }
    }

    /// Seed `values` with every named input's non-empty default.
    pub fn prefill(&mut self) {
        for input in &self.inputs {
            if let (Some(name), Some(value)) = (non_empty(input.value("name")), non_empty(input.value("value"))) {
                self.values.insert(name.to_string(), value.to_string());
            }
        }
    }

    /// Inputs that take a value (everything but submit buttons), optionally
    /// restricted to names matching `pattern` at their start.
    #[must_use]
    pub fn fields(&self, pattern: Option<&Regex>) -> Vec<&Attributes> {
        self.inputs
            .iter()
            .filter(|input| !is_submit(input) && name_matches(input, pattern))
            .collect()
    }

    /// Submit buttons, optionally restricted by name like `fields`.
    #[must_use]
    pub fn actions(&self, pattern: Option<&Regex>) -> Vec<&Attributes> {
        self.inputs
            .iter()
            .filter(|input| is_submit(input) && name_matches(input, pattern))
            .collect()
    }

    #[must_use]
    pub fn field_names(&self, pattern: Option<&Regex>) -> Vec<&str> {
        self.fields(pattern).into_iter().filter_map(|f| f.value("name")).collect()
    }

    #[must_use]
    pub fn action_names(&self, pattern: Option<&Regex>) -> Vec<&str> {
        self.actions(pattern).into_iter().filter_map(|f| f.value("name")).collect()
    }

    /// Drop every value and return the old ones.
    pub fn clear(&mut self) -> BTreeMap<String, String> {
        std::mem::take(&mut self.values)
    }

    pub fn fill<I, K, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.values.extend(values.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_string(), value.to_string());
    }

    /// Forget the value for `name` so its input falls back to its default.
    pub fn unset(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }

    /// Current values as `(name, value)` pairs: named inputs in document order,
    /// then values that match no input. Each name appears once.
    #[must_use]
    pub fn parameters(&self) -> Vec<(String, String)> {
        let mut seen = BTreeSet::new();
        let mut params = Vec::new();
        for input in &self.inputs {
            let Some(name) = non_empty(input.value("name")) else {
                continue;
            };
            if !seen.insert(name) {
                continue;
            }
            if let Some(value) = self.values.get(name) {
                params.push((name.to_string(), value.clone()));
            }
        }
        for (name, value) in &self.values {
            if !seen.contains(name.as_str()) {
                params.push((name.clone(), value.clone()));
            }
        }
        params
    }

    /// Build the parameters a submission would send, without touching the form.
    ///
    /// `extra` values override the form's values. Each field gets its value,
    /// else its document default, else an empty string; with `strip` empty
    /// values are left out. Extra values that match no field follow, then the
    /// chosen action.
    ///
    /// # Errors
    ///
    /// `Error::UnknownAction` when `action` is not the name of a submit input.
    pub fn submit<I, K, V>(&self, action: Option<&str>, extra: I, strip: bool) -> Result<Vec<(String, String)>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let available = self.action_names(None);
        if let Some(action) = action {
            if !available.contains(&action) {
                return Err(Error::UnknownAction {
                    action: action.to_string(),
                    form: self.name.clone(),
                    available: available.iter().map(|a| (*a).to_string()).collect(),
                });
            }
        }

        let extra: Vec<(String, String)> = extra.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        let mut values = self.values.clone();
        values.extend(extra.iter().cloned());

        let mut seen = BTreeSet::new();
        let mut params = Vec::new();
        for field in self.fields(None) {
            let Some(name) = non_empty(field.value("name")) else {
                continue;
            };
            if !seen.insert(name) {
                continue;
            }
            let value = non_empty(values.get(name).map(String::as_str))
                .or_else(|| non_empty(field.value("value")))
                .unwrap_or("");
            if strip && value.is_empty() {
                continue;
            }
            params.push((name.to_string(), value.to_string()));
        }
        for (name, value) in extra {
            if seen.contains(name.as_str()) || (strip && value.is_empty()) {
                continue;
            }
            params.push((name, value));
        }
        if let Some(action) = action {
            let value = values
                .get(action)
                .map(String::as_str)
                .or_else(|| {
                    self.actions(None)
                        .into_iter()
                        .find(|a| a.value("name") == Some(action))
                        .and_then(|a| a.value("value"))
                })
                .unwrap_or("");
            params.push((action.to_string(), value.to_string()));
        }
        Ok(params)
    }

    /// Resolve `action` against the URL of the page the form came from. A
    /// missing or empty action submits to the page itself.
    #[must_use]
    pub fn action_url(&self, base: &Url) -> Option<Url> {
        match self.action.as_deref() {
            None | Some("") => Some(base.clone()),
            Some(action) => base.join(action).ok(),
        }
    }
}

/// Text summary: a header line, then one `type | name= value` row per input
/// sorted by type and name. Rows still holding their default are marked.
impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FORM: {} ({})", self.name, self.action.as_deref().unwrap_or("None"))?;

        let mut rows: Vec<(String, String, String, &str)> = self
            .inputs
            .iter()
            .map(|input| {
                let name = input.value("name");
                let current = name.and_then(|n| self.values.get(n)).map(String::as_str);
                let default = input.value("value");
                let marker = if current.is_some() && current == default { "(default)" } else { "" };
                (
                    input.value("type").unwrap_or("").to_string(),
                    name.unwrap_or("").to_string(),
                    cell(current.unwrap_or("")),
                    marker,
                )
            })
            .collect();
        rows.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));

        let kind_width = rows.iter().map(|r| r.0.len()).max().unwrap_or(0);
        let name_width = rows.iter().map(|r| r.1.len()).max().unwrap_or(0);
        let value_width = rows.iter().map(|r| r.2.chars().count()).max().unwrap_or(0);
        for (kind, name, value, marker) in rows {
            let line = format!("{kind:<kind_width$} | {name:<name_width$}= {value:<value_width$}  {marker}");
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

/// Which form later tags attach to.
enum FormContext {
    None,
    Open(String),
    /// A `<form>` whose name was already taken; its contents are dropped.
    Discarded,
}

/// Which select later options attach to.
enum SelectContext {
    None,
    /// Index of the select in the current form's inputs.
    Open(usize),
    Discarded,
}

fn orphan(tag: &str, context: &'static str) -> Error {
    Error::OrphanTag { tag: tag.to_string(), context }
}

/// Text right after an option tag, used when the option has no `value`.
fn option_text(html: &str, from: usize) -> &str {
    let rest = html.get(from..).unwrap_or("");
    let end = rest.find('<').unwrap_or(rest.len());
    rest[..end].trim()
}

fn option_is_selected(attributes: &Attributes) -> bool {
    match attributes.get("selected") {
        Some(None) => true,
        Some(Some(value)) => value.eq_ignore_ascii_case("selected"),
        None => false,
    }
}

/// Recover every form in `html`, keyed by name.
///
/// Unnamed forms are called `default0`, `default1`, ... in document order.
/// A form whose name is already taken is dropped together with its inputs.
///
/// # Errors
///
/// - `Error::EmptyInput` when `html` is empty.
/// - `Error::OrphanTag` for an `input`, `select` or `textarea` before any
///   `<form>`, or an `option` with no `<select>` in the current form.
/// - `Error::UnexpectedTag` when `Options::form_tags` names a tag the state
///   machine does not handle.
/// - `Error::InvalidPattern` if the custom form tag list does not compile.
///
/// # Example
///
/// ```rust
/// use rs_tagscrape::{extract_forms, Options};
///
/// let html = "<form action=/search><input name=q value=rust><input type=submit name=go></form>";
/// let forms = extract_forms(html, &Options::default()).unwrap();
/// let form = &forms["default0"];
/// assert_eq!(form.action.as_deref(), Some("/search"));
/// assert_eq!(form.values["q"], "rust");
/// assert_eq!(form.action_names(None), ["go"]);
/// ```
pub fn extract_forms(html: &str, options: &Options) -> Result<BTreeMap<String, Form>> {
    if html.is_empty() {
        return Err(Error::EmptyInput);
    }

    let custom;
    let pattern: &Regex = if options.form_tags.iter().map(String::as_str).eq(DEFAULT_FORM_TAGS) {
        &FORM_DATA
    } else {
        custom = form_tag_pattern(&options.form_tags)?;
        &custom
    };

    let mut forms: BTreeMap<String, Form> = BTreeMap::new();
    let mut context = FormContext::None;
    let mut select = SelectContext::None;
    let mut anonymous = 0;

    for caps in pattern.captures_iter(html) {
        let (Some(whole), Some(tag)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let name = tag.as_str().to_ascii_lowercase();
        let attr_start = whole.end();
        let gt = html[attr_start..].find('>').map_or(html.len(), |i| attr_start + i);
        let attr_end = if gt > attr_start && html.as_bytes()[gt - 1] == b'/' { gt - 1 } else { gt };
        let mut attributes = parse_attributes(&html[attr_start..attr_end]);
        let content_start = (gt + 1).min(html.len());

        if name == "form" {
            let form_name = match non_empty(attributes.value("name")) {
                Some(n) => n.to_string(),
                None => {
                    let n = format!("default{anonymous}");
                    anonymous += 1;
                    n
                }
            };
            select = SelectContext::None;
            if forms.contains_key(&form_name) {
                tracing::debug!(form = %form_name, offset = whole.start(), "duplicate form name, dropping form");
                context = FormContext::Discarded;
            } else {
                let action = attributes.value("action").map(|a| entities::expand(a).into_owned());
                forms.insert(form_name.clone(), Form::new(&form_name, action));
                context = FormContext::Open(form_name);
            }
            continue;
        }

        let form = match &context {
            FormContext::None if name == "option" => return Err(orphan(&name, "select")),
            FormContext::None if matches!(name.as_str(), "input" | "select" | "textarea") => {
                return Err(orphan(&name, "form"))
            }
            FormContext::None => None,
            FormContext::Discarded => {
                if name == "select" {
                    select = SelectContext::Discarded;
                }
                continue;
            }
            FormContext::Open(form_name) => forms.get_mut(form_name),
        };

        match name.as_str() {
            "input" => {
                if attributes.iter().any(|(attr, _)| attr.starts_with("on")) {
                    tracing::debug!(input = ?attributes.value("name"), "form input carries script handlers");
                }
                if let Some(form) = form {
                    form.inputs.push(attributes);
                }
            }
            "select" => {
                attributes.insert("type", Some("select"));
                if let Some(form) = form {
                    select = SelectContext::Open(form.inputs.len());
                    form.inputs.push(attributes);
                }
            }
            "option" => {
                let index = match select {
                    SelectContext::None => return Err(orphan(&name, "select")),
                    SelectContext::Discarded => continue,
                    SelectContext::Open(index) => index,
                };
                if !option_is_selected(&attributes) {
                    continue;
                }
                let value = match attributes.value("value") {
                    Some(v) => v.to_string(),
                    None => option_text(html, content_start).to_string(),
                };
                if let Some(current) = form.and_then(|f| f.inputs.get_mut(index)) {
                    current.insert("value", Some(value.as_str()));
                }
            }
            "textarea" => {
                let text_end = TEXTAREA_CLOSE
                    .find_at(html, content_start)
                    .map_or(html.len(), |m| m.start());
                attributes.insert("type", Some("textarea"));
                attributes.insert("value", Some(&html[content_start..text_end]));
                if let Some(form) = form {
                    form.inputs.push(attributes);
                }
            }
            _ => return Err(Error::UnexpectedTag(name)),
        }
    }

    for form in forms.values_mut() {
        form.prefill();
    }
    Ok(forms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forms(html: &str) -> BTreeMap<String, Form> {
        extract_forms(html, &Options::default()).unwrap()
    }

    fn input_names(form: &Form) -> Vec<&str> {
        form.inputs.iter().filter_map(|i| i.value("name")).collect()
    }

    #[test]
    fn duplicate_form_names_keep_the_first() {
        let html = "<form name='x'><input name='a' value='1'></form><form name='x'><input name='b' value='2'></form>";
        let forms = forms(html);
        assert_eq!(forms.len(), 1);
        assert_eq!(input_names(&forms["x"]), ["a"]);
        assert_eq!(forms["x"].values.get("b"), None);
    }

    #[test]
    fn later_forms_recover_after_a_duplicate() {
        let html = "<form name=x><input name=a></form>\
                    <form name=x><select name=s><option value=z selected></select><input name=b></form>\
                    <form name=y><input name=c>";
        let forms = forms(html);
        assert_eq!(input_names(&forms["x"]), ["a"]);
        assert_eq!(input_names(&forms["y"]), ["c"]);
    }

    #[test]
    fn anonymous_forms_are_numbered() {
        let forms = forms("<form><input name=a></form><form action=/b><input name=b></form>");
        let names: Vec<_> = forms.keys().map(String::as_str).collect();
        assert_eq!(names, ["default0", "default1"]);
        assert_eq!(forms["default1"].action.as_deref(), Some("/b"));
        assert_eq!(forms["default0"].action, None);
    }

    #[test]
    fn selected_option_sets_select_default() {
        let html = "<form><select name='s'><option value='a'></option><option value='b' selected></option></select></form>";
        let forms = forms(html);
        let form = &forms["default0"];
        assert_eq!(form.inputs[0].value("type"), Some("select"));
        assert_eq!(form.values["s"], "b");
    }

    #[test]
    fn option_selected_forms() {
        let html = "<form><select name=a><option value=1 SELECTED=selected><option value=2 selected=no></select>\
                    <select name=b><option selected>Two </option></select></form>";
        let forms = forms(html);
        assert_eq!(forms["default0"].values["a"], "1");
        assert_eq!(forms["default0"].values["b"], "Two");
    }

    #[test]
    fn textarea_captures_raw_text() {
        let html = "<form name=f><textarea name=t>hello <b>x</b></TEXTAREA></form><form name=g><textarea name=u>open";
        let forms = forms(html);
        let t = &forms["f"].inputs[0];
        assert_eq!(t.value("type"), Some("textarea"));
        assert_eq!(forms["f"].values["t"], "hello <b>x</b>");
        assert_eq!(forms["g"].values["u"], "open");
    }

    #[test]
    fn action_entities_are_expanded() {
        let forms = forms("<form name=f action='/do?a=1&amp;b=2'></form>");
        assert_eq!(forms["f"].action.as_deref(), Some("/do?a=1&b=2"));
    }

    #[test]
    fn self_closing_inputs_keep_clean_attributes() {
        let forms = forms("<form name=f><input name=q value=x/><input name=r value='y' /></form>");
        assert_eq!(forms["f"].values["q"], "x");
        assert_eq!(forms["f"].values["r"], "y");
    }

    #[test]
    fn prefill_skips_empty_defaults() {
        let forms = forms("<form name=f><input name=a value=''><input value=x><input name=b value=1></form>");
        let values: Vec<_> = forms["f"].values.keys().map(String::as_str).collect();
        assert_eq!(values, ["b"]);
    }

    #[test]
    fn orphan_tags_fail() {
        let err = extract_forms("<input name=a>", &Options::default()).unwrap_err();
        assert!(matches!(err, Error::OrphanTag { ref tag, context: "form" } if tag == "input"));

        let err = extract_forms("<form><option value=a>", &Options::default()).unwrap_err();
        assert!(matches!(err, Error::OrphanTag { context: "select", .. }));

        let html = "<form name=a><select name=s></select></form><form name=b><option value=x>";
        assert!(extract_forms(html, &Options::default()).is_err());
    }

    #[test]
    fn empty_input_fails() {
        assert!(matches!(extract_forms("", &Options::default()), Err(Error::EmptyInput)));
    }

    #[test]
    fn unknown_form_tag_is_fatal() {
        let options = Options {
            form_tags: vec!["form".into(), "button".into()],
            ..Options::default()
        };
        let err = extract_forms("<form><button type=submit>", &options).unwrap_err();
        assert!(matches!(err, Error::UnexpectedTag(ref name) if name == "button"));
    }

    fn login() -> Form {
        let html = "<form name=login action='/do?a=1&amp;b=2'>\
                    <input type=text name=user value=bob>\
                    <input type=password name=pass>\
                    <input type=submit name=go value=Go></form>";
        forms(html).remove("login").unwrap()
    }

    #[test]
    fn fields_and_actions_split_on_submit() {
        let form = login();
        assert_eq!(form.field_names(None), ["user", "pass"]);
        assert_eq!(form.action_names(None), ["go"]);
        let re = Regex::new("us").unwrap();
        assert_eq!(form.field_names(Some(&re)), ["user"]);
        let re = Regex::new("ser").unwrap();
        assert!(form.field_names(Some(&re)).is_empty());
    }

    #[test]
    fn filling_touches_values_only() {
        let mut form = login();
        form.fill([("pass", "secret"), ("remember", "1")]);
        form.set("user", "alice");
        assert_eq!(form.inputs.len(), 3);
        assert_eq!(
            form.parameters(),
            [
                ("user".to_string(), "alice".to_string()),
                ("pass".to_string(), "secret".to_string()),
                ("go".to_string(), "Go".to_string()),
                ("remember".to_string(), "1".to_string()),
            ]
        );
        assert_eq!(form.unset("user"), Some("alice".to_string()));
        let old = form.clear();
        assert_eq!(old.len(), 3);
        assert!(form.values.is_empty());
    }

    #[test]
    fn submit_merges_without_mutating() {
        let form = login();
        let params = form.submit(Some("go"), [("pass", "secret"), ("extra", "1")], false).unwrap();
        let pairs: Vec<_> = params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(pairs, [("user", "bob"), ("pass", "secret"), ("extra", "1"), ("go", "Go")]);
        assert_eq!(form.values.get("pass"), None);
    }

    #[test]
    fn submit_strip_drops_empty_values() {
        let mut form = login();
        form.clear();
        let params = form.submit(None, Vec::<(String, String)>::new(), true).unwrap();
        assert_eq!(params, [("user".to_string(), "bob".to_string())]);
    }

    #[test]
    fn submit_rejects_unknown_action() {
        let form = login();
        let err = form.submit(Some("nope"), Vec::<(&str, &str)>::new(), false).unwrap_err();
        match err {
            Error::UnknownAction { action, form, available } => {
                assert_eq!(action, "nope");
                assert_eq!(form, "login");
                assert_eq!(available, ["go"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn action_url_resolves_against_base() {
        let form = login();
        let base = Url::parse("http://example.com/login/page.html").unwrap();
        assert_eq!(form.action_url(&base).unwrap().as_str(), "http://example.com/do?a=1&b=2");
        let bare = Form::new("x", None);
        assert_eq!(bare.action_url(&base), Some(base.clone()));
    }

    #[test]
    fn display_renders_sorted_table() {
        let html = "<form name=f action=/a><input type=text name=q value=x><input type=hidden name=h value=1></form>";
        let mut form = forms(html).remove("f").unwrap();
        form.set("q", "y");
        let text = form.to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines, ["FORM: f (/a)", "hidden | h= 1  (default)", "text   | q= y"]);
    }

    #[test]
    fn long_values_are_cut_in_display() {
        assert_eq!(cell("abcdefghijklmnopqrstuvwxyz"), "abcdefghijklmnopq...");
        assert_eq!(cell("short"), "short");
    }
}
