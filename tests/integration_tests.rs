use listingviz::data::field;
use listingviz::grid::{BoundingBox, GridAccumulator};
use listingviz::{analyze, load_listings, read_listings, AnalysisConfig, IngestError};
use std::fs;
use std::process::Command;

const HEADER: &str = "id,name,host_id,host_name,neighbourhood_group,neighbourhood,latitude,longitude,room_type,price,minimum_nights,number_of_reviews,last_review,reviews_per_month,calculated_host_listings_count,availability_365";

/// Three listings with hand-checked prices and coordinates.
fn three_rows() -> String {
    [
        HEADER,
        "2539,Clean & quiet apt home by the park,2787,John,Brooklyn,Kensington,40.64749,-73.97237,Private room,149,1,9,2018-10-19,0.21,6,365",
        "2595,Skylit Midtown Castle,2845,Jennifer,Manhattan,Midtown,40.75362,-73.98377,Entire home/apt,225,1,45,2019-05-21,0.38,2,355",
        "3647,THE VILLAGE OF HARLEM....NEW YORK !,4632,Elisabeth,Manhattan,Harlem,40.80902,-73.9419,Private room,150,3,0,,,1,365",
    ]
    .join("\n")
        + "\n"
}

#[test]
fn test_end_to_end_three_rows() {
    let table = read_listings(three_rows().as_bytes()).expect("Failed to read listings");
    let analysis = analyze(&table, &AnalysisConfig::default()).expect("Failed to analyze");

    // (149 + 225 + 150) / 3
    let avg = analysis.average_price.unwrap();
    assert!((avg - 524.0 / 3.0).abs() < 1e-9);
    assert_eq!(analysis.summary(), "Average price: $174.67 per night");

    let groups: Vec<(&str, usize)> = analysis
        .neighbourhood_groups
        .iter()
        .map(|c| (c.category.as_str(), c.count))
        .collect();
    assert_eq!(groups, vec![("Brooklyn", 1), ("Manhattan", 2)]);

    // Kensington: lon fraction 0.5023 -> col 75, lat fraction 0.3629 -> row 54
    let acc = GridAccumulator::new(BoundingBox::NEW_YORK, 150);
    assert_eq!(acc.cell_of(-73.97237, 40.64749), Some((54, 75)));
    assert_eq!(analysis.density_heatmap.get(54, 75), 1.0);
    assert_eq!(analysis.price_heatmap.get(54, 75), 149.0);
    assert_eq!(analysis.reviews_heatmap.get(54, 75), 9.0);
    assert_eq!(analysis.density_heatmap.values().iter().sum::<f64>(), 3.0);
}

#[test]
fn test_columns_match_row_count() {
    let table = read_listings(three_rows().as_bytes()).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.headers(), HEADER.split(',').collect::<Vec<_>>());
    for column in table.columns() {
        assert_eq!(column.data.len(), 3, "column '{}'", column.name);
    }
    assert_eq!(
        table.float_column(field::REVIEWS_PER_MONTH).unwrap(),
        &[0.21, 0.38, 0.0]
    );
}

#[test]
fn test_top_neighbourhoods_average() {
    let csv = [
        HEADER,
        "1,a,1,h,Queens,Astoria,40.76,-73.92,Private room,100,1,0,,,1,0",
        "2,a,1,h,Queens,Astoria,40.76,-73.92,Private room,50,1,0,,,1,0",
        "3,a,1,h,Bronx,Mott Haven,40.81,-73.92,Private room,70,1,0,,,1,0",
        "4,a,1,h,Queens,Astoria,40.76,-73.92,Private room,30,1,0,,,1,0",
        "5,a,1,h,Bronx,Mott Haven,40.81,-73.92,Shared room,90,1,0,,,1,0",
        "6,a,1,h,Manhattan,Harlem,40.80,-73.94,Entire home/apt,400,1,0,,,1,0",
    ]
    .join("\n");
    let table = read_listings(csv.as_bytes()).unwrap();
    let analysis = analyze(&table, &AnalysisConfig::default()).unwrap();

    let top = &analysis.popular_neighbourhoods;
    assert_eq!(top.len(), 3);
    assert_eq!((top[0].category.as_str(), top[0].count, top[0].average), ("Astoria", 3, 60.0));
    assert_eq!((top[1].category.as_str(), top[1].count, top[1].average), ("Mott Haven", 2, 80.0));
    assert_eq!((top[2].category.as_str(), top[2].count, top[2].average), ("Harlem", 1, 400.0));

    let total: usize = analysis.room_types.iter().map(|c| c.count).sum();
    assert_eq!(total, table.len());
}

#[test]
fn test_load_listings_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new_york_data.csv");
    fs::write(&path, three_rows()).unwrap();

    let table = load_listings(&path).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.int_column(field::PRICE).unwrap(), &[149, 225, 150]);
}

#[test]
fn test_malformed_row_aborts_load() {
    let csv = three_rows() + "9999,broken row,1,x,Queens\n";
    let err = read_listings(csv.as_bytes()).unwrap_err();
    assert!(matches!(err, IngestError::FieldCount { row: 4, found: 5, .. }));
}

#[test]
fn test_non_numeric_price_aborts_load() {
    let csv = three_rows().replace(",225,", ",two hundred,");
    let err = read_listings(csv.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("invalid integer 'two hundred'"));
}

#[test]
fn test_cli_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_listingviz"))
        .arg(dir.path().join("missing.csv"))
        .arg("--output-dir")
        .arg(dir.path().join("charts"))
        .output()
        .expect("Failed to spawn listingviz");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load listings"), "stderr: {}", stderr);
}

#[test]
fn test_cli_bad_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"grid_resolution": 0}"#).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_listingviz"))
        .arg(dir.path().join("listings.csv"))
        .arg("--config")
        .arg(&config)
        .output()
        .expect("Failed to spawn listingviz");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("grid_resolution"), "stderr: {}", stderr);
}
