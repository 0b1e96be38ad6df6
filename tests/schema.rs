mod common;

use csv_ddl::schema::{self, ColumnType, InferOptions, RowShapeError};
use csv_ddl::statement;
use encoding_rs::UTF_8;

use common::TestWorkspace;

fn options() -> InferOptions {
    InferOptions {
        delimiter: b',',
        null_token: "NA".to_string(),
        sample_rows: 0,
        encoding: UTF_8,
    }
}

#[test]
fn infers_narrowest_types_and_widths() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("basic.csv", "id,name\n1,alice\n2,bob\n");

    let schema = schema::infer_schema(&input, &options()).expect("infer");
    assert_eq!(schema.columns.len(), 2);
    assert_eq!(schema.columns[0].inferred_type, ColumnType::SmallInt);
    assert_eq!(schema.columns[0].max_width, 1);
    assert_eq!(schema.columns[1].inferred_type, ColumnType::Varchar);
    assert_eq!(schema.columns[1].max_width, 5);

    let statement = statement::create_table(&schema, "people").expect("generate");
    assert!(statement.contains("id smallint"));
    assert!(statement.contains("name varchar(5)"));
}

#[test]
fn varchar_is_terminal_once_reached() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("mixed.csv", "v\n100000\nabc\n7\n3.5\n");

    let schema = schema::infer_schema(&input, &options()).expect("infer");
    assert_eq!(schema.columns[0].inferred_type, ColumnType::Varchar);
}

#[test]
fn integers_widen_through_the_lattice() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("widen.csv", "v\n12\n100000\n3000000000\n");

    let schema = schema::infer_schema(&input, &options()).expect("infer");
    assert_eq!(schema.columns[0].inferred_type, ColumnType::BigInt);
}

#[test]
fn floats_after_integers_settle_on_decimal() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("decimal.csv", "v\n12\n1.5\n7\n");

    let schema = schema::infer_schema(&input, &options()).expect("infer");
    assert_eq!(schema.columns[0].inferred_type, ColumnType::Decimal);
}

#[test]
fn null_only_columns_stay_unset_but_track_width() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("nulls.csv", "v,w\nNA,x\nNA,longer\n");

    let schema = schema::infer_schema(&input, &options()).expect("infer");
    assert_eq!(schema.columns[0].inferred_type, ColumnType::Unset);
    assert_eq!(schema.columns[0].max_width, 2);

    // The generator renders the unset column as a varchar fallback.
    let statement = statement::create_table(&schema, "t").expect("generate");
    assert!(statement.contains("v varchar(2)"));
}

#[test]
fn null_tokens_count_toward_varchar_width() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("width.csv", "v\nhi\nNA\nabcdef\n");

    let schema = schema::infer_schema(&input, &options()).expect("infer");
    assert_eq!(schema.columns[0].inferred_type, ColumnType::Varchar);
    assert_eq!(schema.columns[0].max_width, 6);
}

#[test]
fn custom_null_token_is_honoured() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("custom.csv", "v\n\\N\n5\n");

    let mut opts = options();
    opts.null_token = "\\N".to_string();
    let schema = schema::infer_schema(&input, &opts).expect("infer");
    assert_eq!(schema.columns[0].inferred_type, ColumnType::SmallInt);
}

#[test]
fn short_rows_abort_with_row_shape_error() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("short.csv", "a,b,c\n1,2,3\n4,5\n");

    let err = schema::infer_schema(&input, &options()).expect_err("short row");
    let shape = err
        .downcast_ref::<RowShapeError>()
        .expect("row shape error");
    assert_eq!(shape.row, 2);
    assert_eq!(shape.expected, 3);
    assert_eq!(shape.actual, 2);
}

#[test]
fn sample_rows_limits_the_scan() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("sampled.csv", "v\n1\n2\nabc\n");

    let mut opts = options();
    opts.sample_rows = 2;
    let schema = schema::infer_schema(&input, &opts).expect("infer");
    assert_eq!(schema.columns[0].inferred_type, ColumnType::SmallInt);
}

#[test]
fn schema_meta_round_trips_through_json() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("meta.csv", "id,label\n1,abc\n");
    let meta = workspace.path().join("meta.json");

    let schema = schema::infer_schema(&input, &options()).expect("infer");
    schema.save(&meta).expect("save");
    let reloaded = csv_ddl::schema::Schema::load(&meta).expect("load");
    assert_eq!(reloaded.columns.len(), 2);
    assert_eq!(reloaded.columns[0].name, "id");
    assert_eq!(reloaded.columns[0].inferred_type, ColumnType::SmallInt);
    assert_eq!(reloaded.columns[1].max_width, 3);
}
