//! Request plugins.

use vireo_core::{Request, Response};

use crate::application::Application;

/// Hooks run around every request, in registration order.
///
/// Returning `true` from either hook stops processing: a pre-request stop
/// skips dispatch and all post-request hooks, a post-request stop skips the
/// remaining post-request hooks. The response is written as it stands.
pub trait Plugin: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Runs before routing. Plugins may attach custom items to the request.
    fn on_pre_request(
        &self,
        application: &Application,
        request: &mut Request,
        response: &mut Response,
    ) -> bool {
        let _ = (application, request, response);
        false
    }

    /// Runs after dispatch.
    fn on_post_request(
        &self,
        application: &Application,
        request: &Request,
        response: &mut Response,
    ) -> bool {
        let _ = (application, request, response);
        false
    }
}
