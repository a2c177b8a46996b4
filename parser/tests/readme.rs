//! Tests that the README equation samples parse without errors.

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};

use graphy_parser::parse;

fn check_sample(code_sample: &str) {
    for equation in code_sample.lines().filter(|line| !line.trim().is_empty()) {
        let result = parse(equation);
        assert!(
            result.is_ok(),
            "Equation `{}` has errors: {:?}",
            equation,
            result.errors()
        );
    }
}

#[test]
fn equation_samples_in_readme_are_parsed() {
    const README: &str = include_str!("../README.md");

    let parser = Parser::new(README);
    let mut code: Option<String> = None;
    let mut sample_count = 0;
    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(lang)))
                if lang.as_ref() == "text" =>
            {
                assert!(code.is_none(), "Embedded code samples");
                code = Some(String::with_capacity(1_024));
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(code_sample) = code.take() {
                    assert!(!code_sample.is_empty());
                    check_sample(&code_sample);
                    sample_count += 1;
                }
            }
            Event::Text(text) => {
                if let Some(code) = &mut code {
                    code.push_str(text.as_ref());
                }
            }
            _ => { /* Do nothing */ }
        }
    }
    assert!(sample_count > 0, "No equation samples in README");
}
