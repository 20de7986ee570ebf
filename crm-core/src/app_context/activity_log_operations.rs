use super::AppContext;
use crate::auth::{Actor, LOGIN_REQUIRED};
use crate::database::entities::activity_logs;
use crate::errors::{CoreError, CoreResult};

impl AppContext {
    /// Audit trail of one object, oldest first. Any signed-in user may read it.
    pub async fn activity_logs(
        &self,
        actor: &Actor,
        object_id: &str,
    ) -> CoreResult<Vec<activity_logs::Model>> {
        if !actor.is_authenticated() {
            return Err(CoreError::unauthorized(LOGIN_REQUIRED));
        }
        self.activity_log_service.logs_for_object(object_id).await
    }
}
