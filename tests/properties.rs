use orgmark::inline_parser::parse_inline_str;
use orgmark::lexer::tokenize;
use orgmark::parser::normalize_line_endings;
use orgmark::{Document, HtmlOptions, NodeKind, NodeRef, TextOptions, parse, render_html, render_text};
use proptest::prelude::*;

const SAMPLES: &[&str] = &[
    "",
    "   \n\t\n",
    "* a h1 heading\n",
    "** TODO [#B] Nested :x:y:\n*** deeper\n* back\n",
    "this string /has emphasis text/.\n",
    "- apples\n- oranges\n  - navel\n- bananas\n",
    "#+BEGIN_SRC sh\necho \"foo\"\n#+END_SRC\n",
    "The homepage[fn:1] text.\n[fn:1] The link is: https://orgmode.org",
    "| a | b |\n|---+---|\n| c | d |\n",
    "[[unterminated\n#+BEGIN_QUOTE\nno end\n*bold /italic* mixed/\n",
    "ünïcödé *wörds* — dash\r\n",
];

const DELIMITERS: &[(&str, &str)] = &[
    ("*", "Bold"),
    ("/", "Italic"),
    ("+", "Strikethrough"),
    ("_", "Underline"),
    ("~", "Code"),
    ("=", "Verbatim"),
];

#[test]
fn tokens_cover_input() {
    for input in SAMPLES {
        let tokens = tokenize(input);
        let joined: String = tokens.iter().map(|t| t.text).collect();
        assert_eq!(&joined, input);
        for pair in tokens.windows(2) {
            assert_eq!(pair[0].end, pair[1].offset);
        }
    }
}

#[test]
fn headline_depth_is_monotonic() {
    for input in SAMPLES {
        let doc = parse(input);
        for node in doc.root().descendants() {
            let NodeKind::Headline(headline) = node.kind() else {
                continue;
            };
            for ancestor in node.ancestors() {
                if let NodeKind::Headline(outer) = ancestor.kind() {
                    assert!(outer.depth < headline.depth, "input: {input:?}");
                }
            }
        }
    }
}

#[test]
fn rendering_twice_is_identical() {
    let options = HtmlOptions::default();
    for input in SAMPLES {
        let doc = parse(input);
        assert_eq!(render_html(&doc, &options), render_html(&doc, &options));
    }
}

#[test]
fn emphasis_between_words_is_recognised() {
    for (delimiter, name) in DELIMITERS {
        let input = format!("word {delimiter}text{delimiter} word");
        let doc = parse_inline_str(&input);
        let names: Vec<_> = doc.root().children().map(|n| n.kind().name()).collect();
        assert_eq!(names, vec!["Text", *name, "Text"], "input: {input:?}");
    }
}

#[test]
fn emphasis_with_inner_padding_is_text() {
    for (delimiter, _) in DELIMITERS {
        for input in [
            format!("word {delimiter} text{delimiter} word"),
            format!("word {delimiter}text {delimiter} word"),
        ] {
            let doc = parse_inline_str(&input);
            let names: Vec<_> = doc.root().children().map(|n| n.kind().name()).collect();
            assert_eq!(names, vec!["Text"], "input: {input:?}");
            assert_eq!(doc.root().raw_text(), input);
        }
    }
}

/// Text leaves, in document order, are disjoint slices of the input in the same
/// order. Everything between them is markup the parser consumed.
fn assert_text_follows_input(input: &str, doc: &Document) {
    let source = normalize_line_endings(input);
    let mut cursor = 0;
    for node in doc.root().descendants() {
        let NodeKind::Text(text) = node.kind() else {
            continue;
        };
        match source[cursor..].find(text.as_str()) {
            Some(at) => cursor += at + text.len(),
            None => panic!("{text:?} not found after byte {cursor} of {input:?}"),
        }
    }
}

fn assert_links_consistent(doc: &Document) {
    for node in doc.root().descendants() {
        let parent = node.parent().expect("non-root node has a parent");
        assert!(parent.children().any(|child| child == node));
    }
}

fn assert_depth_monotonic(doc: &Document) {
    for node in doc.root().descendants() {
        let NodeKind::Headline(headline) = node.kind() else {
            continue;
        };
        for ancestor in node.ancestors() {
            if let NodeKind::Headline(outer) = ancestor.kind() {
                assert!(outer.depth < headline.depth);
            }
        }
    }
}

/// Puts the consumed delimiters back around an inline subtree.
fn inline_source(node: NodeRef<'_>) -> String {
    let inner: String = node.children().map(inline_source).collect();
    match node.kind() {
        NodeKind::Text(text) => text.clone(),
        NodeKind::EnDash => "--".to_string(),
        NodeKind::MDash => "---".to_string(),
        NodeKind::Bold => format!("*{inner}*"),
        NodeKind::Italic => format!("/{inner}/"),
        NodeKind::Underline => format!("_{inner}_"),
        NodeKind::Strikethrough => format!("+{inner}+"),
        NodeKind::Code => format!("~{inner}~"),
        NodeKind::Verbatim => format!("={inner}="),
        _ => inner,
    }
}

#[test]
fn text_leaves_cover_samples_in_order() {
    for input in SAMPLES {
        assert_text_follows_input(input, &parse(input));
    }
}

#[test]
fn inline_tree_rebuilds_input() {
    for input in [
        "plain words only",
        "a *bold /nested/ span* and =verb *x*= -- then --- end",
        "2*3*4 and a/b/c stay literal",
        "*unclosed _also +open",
        "---- four dashes",
    ] {
        let doc = parse_inline_str(input);
        assert_eq!(inline_source(doc.root()), input);
    }
}

fn fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,6}",
        "[ \t]{1,3}",
        Just("\n".to_string()),
        Just("\r\n".to_string()),
        prop::sample::select(vec![
            "*", "/", "_", "+", "~", "=", "-", "--", "---", "-----", "|", ":", "#", "[", "]",
            "(", ")", "`", "* ", "** ", "*** ", "TODO ", "DONE ", "[#A] ", ":tag:", "- ",
            "+ ", "1. ", "2) ", "|---+---|", "#+TITLE: t", "#+BEGIN_QUOTE", "#+END_QUOTE",
            "#+BEGIN_SRC sh", "#+END_SRC", "#+BEGIN_VERSE", "#+END_VERSE", "[fn:1]", "[fn::x]",
            "[[a][b]]", "[[file:c.png]]", ": ", "ü",
        ])
        .prop_map(str::to_string),
    ]
}

fn org_document() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment(), 0..40).prop_map(|parts| parts.concat())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn parse_and_render_any_document(input in org_document()) {
        let doc = parse(&input);
        assert_links_consistent(&doc);
        assert_depth_monotonic(&doc);
        assert_text_follows_input(&input, &doc);

        let html_options = HtmlOptions::default();
        prop_assert_eq!(render_html(&doc, &html_options), render_html(&doc, &html_options));
        let text_options = TextOptions::default();
        prop_assert_eq!(render_text(&doc, &text_options), render_text(&doc, &text_options));
        prop_assert_eq!(parse(&input), doc);
    }

    #[test]
    fn tokens_cover_any_document(input in org_document()) {
        let tokens = tokenize(&input);
        let joined: String = tokens.iter().map(|t| t.text).collect();
        prop_assert_eq!(joined, input.clone());
        prop_assert_eq!(tokens.iter().filter(|t| t.text.is_empty()).count(), 1);
    }

    #[test]
    fn inline_parse_keeps_every_delimiter(input in "[a-z */_+~=-]{0,40}") {
        let doc = parse_inline_str(&input);
        prop_assert_eq!(inline_source(doc.root()), input.clone());
    }
}
