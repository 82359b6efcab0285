use crate::output::header;
use crate::parser::pipeline::{BoundaryRule, Pipeline, ScaleSource};
use crate::utils::config::UNTRACKED_SLOT;

/// Display a pipeline's grammar and table columns
pub fn display_schema(pipeline: &Pipeline, show_details: bool) {
    println!("Bench Digest Table Schema");
    println!("Pipeline: {}", pipeline.name);
    println!();

    let delimiter = char::from(pipeline.delimiter);
    println!("{}", header(pipeline).join(&delimiter.to_string()));

    if show_details {
        println!();
        match &pipeline.boundary {
            BoundaryRule::Keyword {
                keyword,
                primary_tag,
            } => println!(
                "Boundary:  lines starting with '{}' (tag '{}' = primary)",
                keyword, primary_tag
            ),
            BoundaryRule::Suffix { primary, secondary } => println!(
                "Boundary:  lines ending with '{}' (primary) or '{}' (secondary)",
                primary, secondary
            ),
        }
        let source = match pipeline.scale_source {
            ScaleSource::File => "auxiliary key=value file",
            ScaleSource::Inline => "inline label:count segments",
        };
        println!("Scale:     {}", source);
        println!(
            "Metrics:   lines starting with '{}' ({} of {} slots tracked)",
            pipeline.metric_keyword,
            pipeline.tracked_slots(),
            pipeline.schedule.len()
        );
        for (slot, field) in pipeline.schedule.iter().enumerate() {
            let name = field
                .and_then(|id| pipeline.schema.name(id))
                .unwrap_or(UNTRACKED_SLOT);
            println!("  {:>2}. {}", slot + 1, name);
        }
        for phase in &pipeline.phases {
            let names: Vec<&str> = phase
                .fields
                .iter()
                .filter_map(|id| pipeline.schema.name(*id))
                .collect();
            println!("Stats:     '{}' -> {}", phase.keyword, names.join(", "));
        }
    } else {
        println!("Use --show for grammar details");
    }
}

/// Display version information
pub fn display_version() {
    println!("Bench Digest v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Turns client/server load-test logs into paired comparison tables.");
}
