//! Document traversal and text rendering on top of scraper.

use crate::constants::BLOCK_TAGS;
use scraper::node::Node;
use scraper::ElementRef;

/// One step of a depth-first walk.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Visit<'a> {
    Element { element: ElementRef<'a>, depth: usize },
    Text { text: &'a str, parent: ElementRef<'a> },
}

enum Frame<'a> {
    Element(ElementRef<'a>, usize),
    Text(&'a str, ElementRef<'a>),
}

/// Lazy pre-order walk over elements and text nodes below (and including) a root.
///
/// Elements for which `skip` returns true are not yielded and their subtree
/// is not entered. Comments and processing instructions are never yielded.
pub(crate) struct Walk<'a, F> {
    stack: Vec<Frame<'a>>,
    skip: F,
}

pub(crate) fn walk<'a, F>(root: ElementRef<'a>, skip: F) -> Walk<'a, F>
where
    F: Fn(&ElementRef<'a>) -> bool,
{
    Walk {
        stack: vec![Frame::Element(root, 0)],
        skip,
    }
}

impl<'a, F> Iterator for Walk<'a, F>
where
    F: Fn(&ElementRef<'a>) -> bool,
{
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.stack.pop()? {
                Frame::Text(text, parent) => return Some(Visit::Text { text, parent }),
                Frame::Element(element, depth) => {
                    if (self.skip)(&element) {
                        continue;
                    }
                    let children: Vec<Frame<'a>> = element
                        .children()
                        .filter_map(|child| match child.value() {
                            Node::Text(text) => Some(Frame::Text(&**text, element)),
                            Node::Element(_) => {
                                ElementRef::wrap(child).map(|el| Frame::Element(el, depth + 1))
                            }
                            _ => None,
                        })
                        .collect();
                    self.stack.extend(children.into_iter().rev());
                    return Some(Visit::Element { element, depth });
                }
            }
        }
    }
}

pub(crate) fn tag_name<'a>(element: &ElementRef<'a>) -> &'a str {
    element.value().name()
}

pub(crate) fn has_tag(element: &ElementRef, tags: &[&str]) -> bool {
    let name = element.value().name();
    tags.iter().any(|t| name.eq_ignore_ascii_case(t))
}

/// Collapse runs of whitespace to one space and trim.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Plain text of `root` as a browser would lay it out: whitespace collapsed
/// inside lines, block elements on lines of their own, skipped subtrees
/// contributing nothing.
pub(crate) fn render_text<F>(root: ElementRef, skip: &F) -> String
where
    F: Fn(&ElementRef) -> bool,
{
    let mut out = String::new();
    let mut pending_space = false;
    append_rendered(root, skip, &mut out, &mut pending_space);
    out.trim_end().to_string()
}

fn append_rendered<F>(element: ElementRef, skip: &F, out: &mut String, pending_space: &mut bool)
where
    F: Fn(&ElementRef) -> bool,
{
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                for c in text.chars() {
                    if c.is_whitespace() {
                        *pending_space = true;
                        continue;
                    }
                    if *pending_space && !out.is_empty() && !out.ends_with('\n') {
                        out.push(' ');
                    }
                    *pending_space = false;
                    out.push(c);
                }
            }
            Node::Element(_) => {
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                if skip(&child_el) {
                    continue;
                }
                let block = has_tag(&child_el, &BLOCK_TAGS);
                if block {
                    break_line(out, pending_space);
                }
                append_rendered(child_el, skip, out, pending_space);
                if block {
                    break_line(out, pending_space);
                }
            }
            _ => {}
        }
    }
}

fn break_line(out: &mut String, pending_space: &mut bool) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    *pending_space = false;
}

/// Position of a snippet inside a rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Located {
    pub chars: usize,
    pub bytes: usize,
}

/// Finds successive snippets in a rendered text.
///
/// Snippets are expected in document order; each search starts where the
/// previous hit ended.
pub(crate) struct TextLocator<'r> {
    rendered: &'r str,
    byte_cursor: usize,
    char_cursor: usize,
}

impl<'r> TextLocator<'r> {
    pub(crate) fn new(rendered: &'r str) -> Self {
        Self {
            rendered,
            byte_cursor: 0,
            char_cursor: 0,
        }
    }

    pub(crate) fn locate(&mut self, snippet: &str) -> Option<Located> {
        if snippet.is_empty() {
            return None;
        }
        let found = self.rendered[self.byte_cursor..].find(snippet)? + self.byte_cursor;
        let chars = self.char_cursor + self.rendered[self.byte_cursor..found].chars().count();
        self.byte_cursor = found + snippet.len();
        self.char_cursor = chars + snippet.chars().count();
        Some(Located {
            chars,
            bytes: found,
        })
    }
}
