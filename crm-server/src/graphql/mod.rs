pub mod context;
pub mod errors;
pub mod mutations;
pub mod queries;
pub mod types;

use std::sync::Arc;

use async_graphql::{EmptySubscription, Schema};
use crm::AppContext;

pub use context::{GraphQLContext, RequestUser};

use mutations::Mutation;
use queries::Query;

pub type GraphQLSchema = Schema<Query, Mutation, EmptySubscription>;

pub fn build_schema(app: Arc<AppContext>) -> GraphQLSchema {
    Schema::build(Query, Mutation::default(), EmptySubscription)
        .data(GraphQLContext::new(app))
        .finish()
}
