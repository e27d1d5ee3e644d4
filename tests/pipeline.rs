use std::fs;

use approx::assert_relative_eq;

use gsea::export::OutputFormat;
use gsea::parser::{Go, Kegg, Kog, Pfam};
use gsea::stats::hypergeom::term_enrichment;
use gsea::{Analysis, AnnotationSource, EnrichmentConfig, GeneList, GeneSetIndex, TermId};

fn genes() -> GeneList {
    GeneList::from_file("tests/genes.txt").unwrap()
}

#[test]
fn gene_list_is_normalized() {
    let genes = genes();
    assert_eq!(genes.len(), 6);
    assert!(genes.contains(&"gene04".into()));
}

#[test]
fn go_annotation() {
    let index = GeneSetIndex::from_file("tests/go.anno.tsv", &Go::default()).unwrap();
    assert_eq!(index.len(), 6);
    // Gene21 has no valid GO term but is still part of the table
    assert_eq!(index.universe_size(), 21);
    assert!(index.contains_gene(&"gene21".into()));
    assert!(index.terms_of(&"gene21".into()).is_none());

    let table = term_enrichment(&genes(), &index, &EnrichmentConfig::default());
    let ids: Vec<&str> = table.iter().map(|row| row.id().as_str()).collect();
    assert_eq!(ids, ["GO:0005840", "GO:0006412", "GO:0003735"]);

    let ribosome = table.get(0).unwrap();
    assert_relative_eq!(ribosome.pvalue(), 17.0 / 20349.0, max_relative = 1e-6);
    assert_eq!(ribosome.term_size(), 4);
    assert_relative_eq!(ribosome.enrichment(), (4.0 / 5.0) / (4.0 / 21.0));
}

#[test]
fn kegg_annotation() {
    let index = GeneSetIndex::from_file("tests/kegg.anno.tsv", &Kegg::default()).unwrap();
    assert_eq!(index.len(), 3);
    // Gene11 has no pathway
    assert_eq!(index.universe_size(), 11);

    let glycolysis = index.genes_of(&TermId::from("ko00010")).unwrap();
    assert_eq!(glycolysis.len(), 3);

    let table = term_enrichment(&genes(), &index, &EnrichmentConfig::default());
    assert_eq!(table.len(), 1);
    let ribosome = table.get(0).unwrap();
    assert_eq!(ribosome.id().as_str(), "ko03010");
    assert_eq!(ribosome.class(), Some("Genetic Information Processing"));
    assert_relative_eq!(ribosome.pvalue(), 1.0 / 330.0, max_relative = 1e-6);
}

#[test]
fn kog_annotation() {
    let index = GeneSetIndex::from_file("tests/kog.anno.tsv", &Kog).unwrap();
    assert_eq!(index.len(), 3);

    let table = term_enrichment(&genes(), &index, &EnrichmentConfig::default());
    assert_eq!(table.len(), 1);
    let row = table.get(0).unwrap();
    assert_eq!(row.id().as_str(), "KOG0001");
    assert_eq!(row.name(), "60S ribosomal protein L2");
    assert_relative_eq!(row.pvalue(), 7.0 / 210.0, max_relative = 1e-6);
}

#[test]
fn pfam_annotation() {
    let index = GeneSetIndex::from_file("tests/pfam.anno.tsv", &Pfam::default()).unwrap();
    assert_eq!(index.len(), 3);
    assert_eq!(index.terms_of(&"gene07".into()).unwrap().len(), 2);

    let table = term_enrichment(&genes(), &index, &EnrichmentConfig::default());
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(0).unwrap().name(), "Ribosomal_L2");
}

#[test]
fn gmt_annotation() {
    let index = GeneSetIndex::from_gmt("tests/sets.gmt").unwrap();
    assert_eq!(index.len(), 2);
    assert_eq!(index.universe_size(), 10);

    let table = term_enrichment(&genes(), &index, &EnrichmentConfig::default());
    assert_eq!(table.get(0).unwrap().id().as_str(), "ribosome_genes");
}

#[test]
fn gmt_round_trip() {
    let index = GeneSetIndex::from_file("tests/kegg.anno.tsv", &Kegg::default()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kegg.gmt");
    index.save_gmt(&path).unwrap();

    let reloaded = GeneSetIndex::from_gmt(&path).unwrap();
    assert_eq!(reloaded.len(), index.len());
    assert!(reloaded.universe().is_subset(index.universe()));
    assert!(!reloaded.contains_gene(&"gene11".into()));
    for term in &index {
        assert_eq!(reloaded.genes_of(term.id()), Some(term.genes()));
        assert_eq!(reloaded.term(term.id()).unwrap().name(), term.name());
    }
}

#[test]
fn full_analysis() {
    let analysis = Analysis::new(genes())
        .with_annotation(AnnotationSource::Go, "tests/go.anno.tsv")
        .unwrap()
        .with_annotation(AnnotationSource::Pfam, "tests/pfam.anno.tsv")
        .unwrap()
        .with_annotation(AnnotationSource::Kog, "tests/kog.anno.tsv")
        .unwrap()
        .with_annotation(AnnotationSource::Kegg, "tests/kegg.anno.tsv")
        .unwrap()
        .with_annotation(AnnotationSource::Gmt, "tests/sets.gmt")
        .unwrap()
        .with_correction(Some(0.05));

    let results = analysis.run();
    let names: Vec<&str> = results.iter().map(|res| res.name()).collect();
    assert_eq!(
        names,
        [
            "go_res",
            "go_bp_res",
            "go_cc_res",
            "go_mf_res",
            "kegg_res",
            "kog_res",
            "pfam_res",
            "gmt_res"
        ]
    );

    let dir = tempfile::tempdir().unwrap();
    let files = analysis.save(dir.path(), OutputFormat::Tsv).unwrap();
    assert_eq!(files.len(), 2 * results.iter().filter(|r| !r.table().is_empty()).count());

    let go = fs::read_to_string(dir.path().join("go_res.tsv")).unwrap();
    let header = go.lines().next().unwrap();
    assert_eq!(
        header,
        "Term\tTerm_name\tAdjusted P-value\tCount\tTerm_size\tFold_enrichment\tScore"
    );
    assert!(dir.path().join("go_res_ranked.tsv").exists());
}

#[test]
fn xlsx_output() {
    let analysis = Analysis::new(genes())
        .with_annotation(AnnotationSource::Kegg, "tests/kegg.anno.tsv")
        .unwrap();
    let dir = tempfile::tempdir().unwrap();
    let files = analysis.save(dir.path(), OutputFormat::Xlsx).unwrap();
    assert_eq!(files.len(), 2);
    assert!(dir.path().join("kegg_res.xlsx").exists());
    assert!(dir.path().join("kegg_res_ranked.xlsx").exists());
}
