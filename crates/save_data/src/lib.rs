pub mod usage_data;
