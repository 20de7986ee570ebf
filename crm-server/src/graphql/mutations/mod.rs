// Mutation root, one submodule per functional area.

mod customers;
mod deals;
mod messenger_apps;
mod product_categories;
mod products;
mod users;

use async_graphql::*;

/// Main mutation root that combines all mutation submodules
#[derive(Default, MergedObject)]
pub struct Mutation(
    pub customers::CustomerMutation,
    pub products::ProductMutation,
    pub product_categories::ProductCategoryMutation,
    pub deals::DealMutation,
    pub messenger_apps::MessengerAppMutation,
    pub users::UserMutation,
);
