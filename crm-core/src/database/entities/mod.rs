pub mod activity_logs;
pub mod customers;
pub mod deal_product_lines;
pub mod deals;
pub mod messenger_apps;
pub mod product_categories;
pub mod products;
pub mod users;
