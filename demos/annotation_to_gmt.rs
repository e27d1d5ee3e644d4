use std::process;

use gsea::AnnotationSource;

fn main() {
    simple_logger::init_with_env().unwrap();

    let mut args = std::env::args();
    if args.len() < 4 {
        println!("Converts an annotation table into GMT files, one per term class\n\n");
        println!("Usage\nannotation_to_gmt <SOURCE> <FILE> <PREFIX>");
        println!("\nannotation_to_gmt go GO.anno.tsv out/go\n");
        process::exit(1)
    }

    let source: AnnotationSource = args.nth(1).unwrap().parse().unwrap();
    let index = source.load(args.next().unwrap()).unwrap();
    let prefix = args.next().unwrap();

    index.save_gmt(format!("{prefix}.gmt")).unwrap();
    let files = index.save_gmt_by_class(&prefix).unwrap();

    println!(
        "Terms: {}\nGenes: {}\nClass files: {}",
        index.len(),
        index.universe_size(),
        files.len()
    );
}
