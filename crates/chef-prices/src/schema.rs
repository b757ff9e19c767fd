use arrow_schema::{DataType, Field, Schema, TimeUnit};
use std::sync::Arc;

pub const DAY_FORMAT: &str = "%Y-%m-%d";

pub fn build_price_schema() -> Arc<Schema> {
	Arc::new(Schema::new(vec![
		Field::new("keyword", DataType::Utf8, false),
		Field::new("name", DataType::Utf8, false),
		Field::new("url", DataType::Utf8, false),
		Field::new("price", DataType::Float64, false),
		Field::new("day", DataType::Utf8, false),
		Field::new("captured_at", DataType::Timestamp(TimeUnit::Millisecond, None), false),
	]))
}
