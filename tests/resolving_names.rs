//! Name resolution over the sample library

use rstc::rst::ast::NodeType;
use rstc::rst::resolving::WarningCallback;
use rstc::rst::testing::Rstplore;
use rstc::rst::Compiler;

#[test]
fn test_footnote_numbers_reserve_manual_labels() {
    let compilation = Rstplore::resolving(1).compile();
    let doc = &compilation.document;
    let res = &compilation.resolution;

    let defs = doc.find_all(NodeType::FootnoteDef);
    let numbers: Vec<Option<u64>> = defs.iter().map(|d| res.footnote_number(*d)).collect();
    assert_eq!(numbers, vec![Some(2), Some(1), Some(3)]);

    let refs = doc.find_all(NodeType::FootnoteRef);
    assert_eq!(res.footnote_def(refs[0]), Some(defs[0]));
    assert_eq!(res.footnote_def(refs[1]), Some(defs[1]));
    assert_eq!(res.footnote_def(refs[2]), Some(defs[2]));
    assert_eq!(res.footnote_backlinks(defs[0]), &[refs[0]]);
    assert!(compilation.warnings().is_empty());
}

#[test]
fn test_section_names_are_deduplicated() {
    let compilation = Rstplore::sections(2).compile();
    let sections = compilation.document.find_all(NodeType::Section);
    let res = &compilation.resolution;
    assert_eq!(res.section_name(sections[0]), Some("introduction"));
    assert_eq!(res.section_name(sections[1]), Some("introduction-1"));
    assert_eq!(res.node_for_name("introduction-1"), Some(sections[1]));
}

#[test]
fn test_anonymous_refs_pair_by_position() {
    let compilation = Rstplore::resolving(2).compile();
    let doc = &compilation.document;
    let res = &compilation.resolution;

    let refs = doc.find_all(NodeType::HyperlinkRef);
    let targets = doc.find_all(NodeType::HyperlinkTarget);
    assert_eq!(res.anonymous_target(refs[0]), Some(targets[0]));
    assert_eq!(res.anonymous_target(refs[1]), Some(targets[1]));
    assert_eq!(res.ref_url(refs[0]), Some("https://one.example/"));
    assert_eq!(res.ref_url(refs[1]), Some("https://two.example/"));
}

#[test]
fn test_indirect_and_empty_targets() {
    let compilation = Rstplore::resolving(3).compile();
    let doc = &compilation.document;
    let res = &compilation.resolution;

    assert_eq!(res.resolve_url("docs"), Some("https://www.python.org/"));
    let refs = doc.find_all(NodeType::HyperlinkRef);
    assert_eq!(res.ref_url(refs[0]), Some("https://www.python.org/"));

    let landing = *doc.body().last().unwrap();
    assert_eq!(doc.node_type(landing), NodeType::Paragraph);
    assert_eq!(res.anchor(landing), Some("landing"));
    assert_eq!(res.resolve_url("landing"), Some("#landing"));
}

#[test]
fn test_unresolved_references_are_warnings() {
    let mut seen = Vec::new();
    let source = Rstplore::resolving(4).source();
    let compilation = Compiler::default()
        .compile_with_sink(&source, &mut WarningCallback(|w: &str| seen.push(w.to_string())))
        .unwrap();

    assert_eq!(compilation.warnings().len(), 3);
    assert_eq!(seen, compilation.warnings());
    assert!(seen.iter().any(|w| w.contains("[7]")));
    assert!(seen.iter().any(|w| w.contains("nobody")));
    assert!(seen.iter().any(|w| w.contains("nowhere")));
}

#[test]
fn test_citations_and_named_footnotes() {
    let compilation = Rstplore::explicit(2).compile();
    let doc = &compilation.document;
    let res = &compilation.resolution;
    let defs = doc.find_all(NodeType::FootnoteDef);
    let numbers: Vec<Option<u64>> = defs.iter().map(|d| res.footnote_number(*d)).collect();
    assert_eq!(numbers, vec![Some(1), Some(2), Some(3), None]);
    assert_eq!(res.footnote_symbol(defs[3]).as_deref(), Some("*"));
    assert_eq!(res.simple_name(defs[2]), Some("note"));

    let citation = doc.find_first(NodeType::CitationDef).unwrap();
    assert_eq!(res.simple_name(citation), Some("cit2002"));
}

#[test]
fn test_resolution_is_idempotent() {
    let compiler = Compiler::default();
    for number in 1..=4 {
        let source = Rstplore::resolving(number).source();
        let doc = compiler.parse(&source).unwrap();
        let first = compiler.resolve(&doc, &mut Vec::<String>::new()).unwrap();
        let second = compiler.resolve(&doc, &mut Vec::<String>::new()).unwrap();
        assert_eq!(first, second, "resolving sample {} twice differs", number);
    }
}

#[test]
fn test_unmatched_footnote_ref_stops_linking() {
    let source = "[#]_ [99]_ [#]_\n\n.. [#] one\n.. [#] two\n";
    let compilation = Compiler::default().compile(source).unwrap();
    let doc = &compilation.document;
    let res = &compilation.resolution;

    let refs = doc.find_all(NodeType::FootnoteRef);
    let defs = doc.find_all(NodeType::FootnoteDef);
    assert_eq!(refs.len(), 3);
    assert_eq!(res.footnote_def(refs[0]), Some(defs[0]));
    assert_eq!(res.footnote_def(refs[1]), None);
    assert_eq!(res.footnote_def(refs[2]), None);
    assert_eq!(res.footnote_backlinks(defs[0]), &[refs[0]]);
    assert!(res.footnote_backlinks(defs[1]).is_empty());

    assert_eq!(compilation.warnings().len(), 1);
    assert!(compilation.warnings()[0].contains("[99]"));
}

#[test]
fn test_unmatched_citation_ref_stops_linking() {
    let source = "[cit]_ [missing]_ [cit]_\n\n.. [cit] A book.\n";
    let compilation = Compiler::default().compile(source).unwrap();
    let doc = &compilation.document;
    let res = &compilation.resolution;

    let refs = doc.find_all(NodeType::CitationRef);
    let def = doc.find_first(NodeType::CitationDef).unwrap();
    assert_eq!(refs.len(), 3);
    assert_eq!(res.citation_def(refs[0]), Some(def));
    assert_eq!(res.citation_def(refs[2]), None);
    assert_eq!(res.citation_backlinks(def), &[refs[0]]);
    assert_eq!(compilation.warnings().len(), 1);
}
