//! The three supported file layouts encoding the same disease-symptom
//! mapping must train to the same vocabulary and agree on top-1 predictions.

mod common;

use common::{service_for, top1, write_dataset};
use tempfile::tempdir;

const LONG: &str = "\
Disease,Symptoms,Medicines,Diet
Flu,\"fever,cough,body aches\",\"Oseltamivir,Rest\",\"Fluids,Light foods\"
Diabetes,\"excessive thirst,frequent urination,blurred vision\",Metformin,Low sugar diet
Gastroenteritis,\"nausea,vomiting,diarrhea,stomach pain\",ORS,BRAT diet
";

const ONE_HOT: &str = "\
Disease,fever,cough,body aches,excessive thirst,frequent urination,blurred vision,nausea,vomiting,diarrhea,stomach pain,Medicines,Diet
Flu,1,1,1,0,0,0,0,0,0,0,\"Oseltamivir,Rest\",\"Fluids,Light foods\"
Diabetes,0,0,0,1,1,1,0,0,0,0,Metformin,Low sugar diet
Gastroenteritis,0,0,0,0,0,0,1,1,1,1,ORS,BRAT diet
";

const MULTI_COLUMN: &str = "\
Disease,Symptom_1,Symptom_2,Symptom_3,Symptom_4,Medicines,Diet
Flu,fever,cough,body aches,,\"Oseltamivir,Rest\",\"Fluids,Light foods\"
Diabetes,excessive thirst,frequent urination,blurred vision,,Metformin,Low sugar diet
Gastroenteritis,nausea,vomiting,diarrhea,stomach pain,ORS,BRAT diet
";

const QUERIES: &[&[&str]] = &[
    &["fever", "cough"],
    &["blurred vision"],
    &["nausea", "diarrhea", "stomach pain"],
];

#[test]
fn all_formats_build_the_same_vocabulary() {
    let dir = tempdir().unwrap();
    let mut vocabularies = Vec::new();
    for (name, contents) in [("long.csv", LONG), ("one_hot.csv", ONE_HOT), ("multi.csv", MULTI_COLUMN)] {
        let path = write_dataset(dir.path(), name, contents);
        let service = service_for(&path);
        let artifact = service.artifact().unwrap();
        vocabularies.push(artifact.vocabulary.terms().to_vec());
    }
    assert_eq!(vocabularies[0], vocabularies[1]);
    assert_eq!(vocabularies[0], vocabularies[2]);
    assert_eq!(vocabularies[0].len(), 10);
}

#[test]
fn all_formats_share_the_same_fingerprint_and_labels() {
    let dir = tempdir().unwrap();
    let mut fingerprints = Vec::new();
    for (name, contents) in [("long.csv", LONG), ("one_hot.csv", ONE_HOT), ("multi.csv", MULTI_COLUMN)] {
        let path = write_dataset(dir.path(), name, contents);
        let service = service_for(&path);
        let artifact = service.artifact().unwrap();
        let labels: Vec<String> = artifact
            .labels
            .labels()
            .iter()
            .map(|label| label.canonical.clone())
            .collect();
        assert_eq!(labels, ["diabetes", "flu", "gastroenteritis"]);
        fingerprints.push(artifact.fingerprint);
    }
    assert_eq!(fingerprints[0], fingerprints[1]);
    assert_eq!(fingerprints[0], fingerprints[2]);
}

#[test]
fn all_formats_agree_on_top_predictions() {
    let dir = tempdir().unwrap();
    let long = service_for(&write_dataset(dir.path(), "long.csv", LONG));
    let one_hot = service_for(&write_dataset(dir.path(), "one_hot.csv", ONE_HOT));
    let multi = service_for(&write_dataset(dir.path(), "multi.csv", MULTI_COLUMN));

    for query in QUERIES {
        let expected = top1(&long, query);
        assert_eq!(top1(&one_hot, query), expected, "one-hot disagrees on {query:?}");
        assert_eq!(top1(&multi, query), expected, "multi-column disagrees on {query:?}");
    }
}

#[test]
fn equivalent_confidences_within_tolerance() {
    let dir = tempdir().unwrap();
    let long = service_for(&write_dataset(dir.path(), "long.csv", LONG));
    let one_hot = service_for(&write_dataset(dir.path(), "one_hot.csv", ONE_HOT));

    let a = long.predict(&["fever", "cough"], 1).unwrap();
    let b = one_hot.predict(&["fever", "cough"], 1).unwrap();
    let delta = (a.ranking[0].confidence - b.ranking[0].confidence).abs();
    assert!(delta < 1e-9, "identical canonical content must train identically, delta {delta}");
}
