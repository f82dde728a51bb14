use crate::utils::config::{DEMO_DATASETS, SCHEMA_VERSION};

/// Display report schema information
pub fn display_schema(show_details: bool) {
    println!("Flame Layout Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string          - Schema version (e.g., '1.0.0')");
        println!("  generatedAt: string      - ISO 8601 timestamp");
        println!("  width: number            - Width budget of the active root");
        println!("  totalValue: number       - Samples under the true root");
        println!("  zoom: array              - Breadcrumb paths, true root first");
        println!("  nodes: array             - Positioned nodes in pre-order");
        println!("    name: string           - Frame name");
        println!("    totalValue: number     - Samples in this subtree");
        println!("    selfValue: number      - Samples in this frame itself");
        println!("    x0: number             - Left edge");
        println!("    x1: number             - Right edge");
        println!("    depth: number          - Row, relative to the active root");
        println!("    path: string           - ';'-joined frames from the root");
        println!("  search: object?          - Present when --search was given");
        println!("    query: string          - Query as typed");
        println!("    matches: array         - Matching paths");
        println!("    stats: object?         - count, selfValue, percentage");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Flame Layout v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!("Demo datasets: {}", DEMO_DATASETS.join(", "));
    println!();
    println!("A flame graph layout engine with zoom and search.");
}
