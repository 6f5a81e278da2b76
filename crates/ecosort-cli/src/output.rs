//! Output formatting module

use ecosort_store::{total_items, CategorySlice};
use ecosort_types::{ClassificationResult, OutputFormat, Result, ScanResult};

pub fn output_result(output_format: OutputFormat, result: &ClassificationResult) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(result)?;
        println!("{}", content);
        return Ok(());
    }

    // Table format
    println!("\nAnalysis Result");
    println!("===============");
    println!("Items found: {}", result.len());

    if result.is_empty() {
        println!("\nNo waste items were identified in this image.");
        return Ok(());
    }

    for (index, item) in result.items.iter().enumerate() {
        println!("\n#{} {}", index + 1, item.item_name);
        println!("Material:     {}", item.material);
        println!("Category:     {}", item.category);
        println!("Confidence:   {:.0}%", item.confidence * 100.0);
        println!("Disposal:     {}", item.disposal_instruction);

        if !item.recycling_tips.is_empty() {
            println!("Tips:");
            for tip in &item.recycling_tips {
                println!("  - {}", tip);
            }
        }

        if let Some(ref fact) = item.fun_fact {
            println!("Fun fact:     {}", fact);
        }
    }

    Ok(())
}

pub fn output_history(output_format: OutputFormat, entries: &[ScanResult], limit: usize) -> Result<()> {
    let shown: Vec<&ScanResult> = entries.iter().take(limit).collect();

    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    println!("Scan History");
    println!("============");
    println!("Total scans: {}", entries.len());
    println!();

    if shown.is_empty() {
        println!("No history available.");
        return Ok(());
    }

    for scan in shown {
        let count = scan.items.len();
        println!(
            "{}  {}  {} item{}",
            scan.timestamp.format("%Y-%m-%d %H:%M"),
            scan.id,
            count,
            if count == 1 { "" } else { "s" }
        );
        for item in &scan.items {
            println!("    {:<36} {}", truncate(&item.item_name, 36), item.category);
        }
    }

    Ok(())
}

pub fn output_breakdown(output_format: OutputFormat, slices: &[CategorySlice], scans: usize) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(slices)?);
        return Ok(());
    }

    let total = total_items(slices);
    println!("Category Breakdown");
    println!("==================");
    println!("{} item(s) across {} scan(s)", total, scans);

    if slices.is_empty() {
        println!("\nScan something to see your statistics.");
        return Ok(());
    }

    println!();
    println!("{:<16} {:>6} {:>8}  {}", "Category", "Items", "Share", "Color");
    println!("{}", "-".repeat(42));
    for slice in slices {
        println!(
            "{:<16} {:>6} {:>7.1}%  {}",
            slice.category.label(),
            slice.count,
            percent(slice.count, total),
            slice.color
        );
    }

    Ok(())
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 * 100.0 / total as f64
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
