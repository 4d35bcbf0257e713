//! Integration tests for property changes
//!
//! Covers:
//! - Deletion with no surviving super-property drops every statement
//! - Deletion moving statements onto a surviving super-property
//! - Rename rewriting the predicate only
//! - Property batches running after class batches share one audit record

use abox_update::{
    Abox, AtomicOntologyChange, ChangeLogger, ChangeOutcome, ChangeProcessor, ChangeRecord,
    MigrationContext, SchemaVersion, Tbox,
};
use oxigraph::model::{Literal, NamedNode, Triple};

const OLD_TBOX: &str = r#"
    @prefix owl: <http://www.w3.org/2002/07/owl#> .
    @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
    @prefix ex: <http://example.org/> .

    ex:Person a owl:Class .
    ex:related a owl:ObjectProperty .
    ex:knows a owl:ObjectProperty ; rdfs:subPropertyOf ex:related .
    ex:colleagueOf a owl:ObjectProperty ; rdfs:subPropertyOf ex:knows .
    ex:alias a owl:DatatypeProperty .
    ex:nickname a owl:DatatypeProperty ; rdfs:subPropertyOf ex:alias .
    ex:age a owl:DatatypeProperty .
"#;

const NEW_TBOX: &str = r#"
    @prefix owl: <http://www.w3.org/2002/07/owl#> .
    @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
    @prefix ex: <http://example.org/> .

    ex:Human a owl:Class .
    ex:related a owl:ObjectProperty .
    ex:knows a owl:ObjectProperty ; rdfs:subPropertyOf ex:related .
    ex:ageInYears a owl:DatatypeProperty .
"#;

const ABOX: &str = r#"
    @prefix ex: <http://example.org/> .

    ex:ann a ex:Person ; ex:nickname "Annie" ; ex:age 41 ; ex:colleagueOf ex:bob .
    ex:bob a ex:Person ; ex:nickname "Bobby" , "B" ; ex:age 37 .
    ex:cid ex:colleagueOf ex:ann ; ex:knows ex:bob .
"#;

fn ex(local: &str) -> NamedNode {
    NamedNode::new(format!("http://example.org/{}", local)).unwrap()
}

fn uri(local: &str) -> String {
    format!("http://example.org/{}", local)
}

struct Harness {
    old: Tbox,
    new: Tbox,
    abox: Abox,
    logger: ChangeLogger,
    record: ChangeRecord,
}

impl Harness {
    fn new() -> Self {
        Self {
            old: Tbox::from_turtle(SchemaVersion::Old, OLD_TBOX).unwrap(),
            new: Tbox::from_turtle(SchemaVersion::New, NEW_TBOX).unwrap(),
            abox: Abox::from_turtle(ABOX).unwrap(),
            logger: ChangeLogger::new(),
            record: ChangeRecord::new(),
        }
    }

    fn processor(&self) -> ChangeProcessor<'_> {
        ChangeProcessor::new(MigrationContext {
            old_tbox: &self.old,
            new_tbox: &self.new,
            abox: &self.abox,
            logger: &self.logger,
            record: &self.record,
        })
    }

    fn uses(&self, property: &NamedNode) -> usize {
        self.abox
            .read()
            .unwrap()
            .count(None, Some(property.as_ref()), None)
            .unwrap()
    }
}

#[test]
fn test_delete_property_without_survivor_removes_statements() {
    let h = Harness::new();
    let before = h.abox.len().unwrap();
    assert_eq!(h.uses(&ex("nickname")), 3);

    let outcome = h
        .processor()
        .properties()
        .delete_property(&AtomicOntologyChange::delete(&uri("nickname")))
        .unwrap();

    assert_eq!(
        outcome,
        ChangeOutcome::Removed {
            property: ex("nickname"),
            retracted: 3,
        }
    );
    assert_eq!(h.uses(&ex("nickname")), 0);
    assert_eq!(h.abox.len().unwrap(), before - 3);

    let retractions = h.record.retractions().unwrap();
    assert_eq!(retractions.len(), 3);
    assert!(retractions.contains(&Triple::new(
        ex("bob"),
        ex("nickname"),
        Literal::new_simple_literal("Bobby"),
    )));
    assert!(h.record.additions().unwrap().is_empty());

    let messages = h.logger.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("3 statements using http://example.org/nickname were removed"));
}

#[test]
fn test_delete_property_moves_to_surviving_super_property() {
    let h = Harness::new();

    let outcome = h
        .processor()
        .properties()
        .delete_property(&AtomicOntologyChange::delete(&uri("colleagueOf")))
        .unwrap();

    assert_eq!(
        outcome,
        ChangeOutcome::Rewritten {
            from: ex("colleagueOf"),
            to: ex("knows"),
            retracted: 2,
            added: 2,
        }
    );
    assert_eq!(h.uses(&ex("colleagueOf")), 0);
    assert_eq!(h.uses(&ex("knows")), 3);
    assert!(h
        .abox
        .contains(&Triple::new(ex("ann"), ex("knows"), ex("bob")))
        .unwrap());
}

#[test]
fn test_rename_property_keeps_subjects_and_objects() {
    let h = Harness::new();

    h.processor()
        .properties()
        .rename_property(&AtomicOntologyChange::rename(&uri("age"), &uri("ageInYears")))
        .unwrap();

    assert_eq!(h.uses(&ex("age")), 0);
    assert_eq!(h.uses(&ex("ageInYears")), 2);
    let forty_one = h
        .abox
        .read()
        .unwrap()
        .statements(Some(ex("ann").as_ref().into()), Some(ex("ageInYears").as_ref()), None)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(forty_one.len(), 1);
    match &forty_one[0].object {
        oxigraph::model::Term::Literal(literal) => assert_eq!(literal.value(), "41"),
        other => panic!("Expected literal, got {}", other),
    }

    let additions = h.record.additions().unwrap();
    let retractions = h.record.retractions().unwrap();
    assert_eq!(additions.len(), 2);
    assert_eq!(retractions.len(), 2);
}

#[test]
fn test_class_then_property_batches_share_audit_record() {
    let h = Harness::new();
    let processor = h.processor();

    let classes = processor.process_class_changes(&[AtomicOntologyChange::rename(
        &uri("Person"),
        &uri("Human"),
    )]);
    let properties = processor.process_property_changes(&[
        AtomicOntologyChange::delete(&uri("nickname")),
        AtomicOntologyChange::rename(&uri("age"), &uri("ageInYears")),
        AtomicOntologyChange::delete(&uri("missing")),
    ]);

    assert_eq!(classes.applied, 1);
    assert_eq!(properties.applied, 2);
    assert_eq!(properties.failed, 1);
    assert!(h.logger.errors()[0].contains("Didn't find the property"));

    // 2 type statements + 3 nicknames + 2 ages retracted; 2 types + 2 ages added
    assert_eq!(h.record.retractions().unwrap().len(), 7);
    assert_eq!(h.record.additions().unwrap().len(), 4);
}
