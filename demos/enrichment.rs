use std::process;

use gsea::export::OutputFormat;
use gsea::{Analysis, AnnotationSource, NamedResult};

/// Parses a `<SOURCE>=<FILE>` argument, e.g. `go=GO.anno.tsv`
fn annotation(arg: &str) -> (AnnotationSource, &str) {
    let (source, file) = arg
        .split_once('=')
        .expect("annotations must be given as <SOURCE>=<FILE>");
    (source.parse().expect("invalid annotation source"), file)
}

/// Prints the top terms of every result table
fn print_result(result: &NamedResult, output_len: usize) {
    println!("### {} ({} terms) ###", result.name(), result.table().len());
    for term in result.table().iter().take(output_len) {
        println!(
            "{}\t{}\t{:e}\t({})",
            term.id(),
            term.name(),
            term.pvalue(),
            term.enrichment()
        );
    }
    println!();
}

fn main() {
    simple_logger::init_with_env().unwrap();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        println!("Tests a gene list for enriched annotation terms\n\n");
        println!("Usage\nenrichment <GENE LIST> <SOURCE>=<FILE>... [OUTPUT DIR] [FORMAT]");
        println!("\nenrichment genes.txt go=GO.anno.tsv kegg=KEGG.anno.tsv");
        println!("\nenrichment genes.txt pfam=pfam.anno.tsv results/ xlsx\n");
        println!("SOURCE is one of go, kegg, kog, pfam, gmt");
        process::exit(1)
    }

    let mut analysis = Analysis::from_file(&args[1]).unwrap();
    let mut rest = args[2..].iter().peekable();
    while let Some(arg) = rest.next_if(|arg| arg.contains('=')) {
        let (source, file) = annotation(arg);
        analysis = analysis.with_annotation(source, file).unwrap();
    }
    let analysis = analysis.with_correction(Some(0.05));

    for result in analysis.run() {
        print_result(&result, 10);
    }

    if let Some(out_dir) = rest.next() {
        let format: OutputFormat = rest
            .next()
            .map_or(Ok(OutputFormat::Tsv), |format| format.parse())
            .unwrap();
        let files = analysis.save(out_dir, format).unwrap();
        println!("Saved {} files to {}", files.len(), out_dir);
    }
}
