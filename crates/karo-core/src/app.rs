use crate::backend::Backend;
use crate::error::CoreError;
use crate::forms::{LoginForm, SignupForm};
use crate::grid::{Grid, MutationOutcome};
use crate::routes::{History, Navigator, Route};
use crate::session::SessionGuard;
use std::sync::Arc;
use tracing::debug;

/// Routes, the guard of the mounted view and the task grid over one backend.
pub struct App<B> {
    backend: Arc<B>,
    history: Arc<History>,
    guard: Option<SessionGuard>,
    grid: Grid,
}

impl<B> App<B>
where
    B: Backend + 'static,
{
    pub fn new(backend: B) -> Self {
        Self::with_backend(Arc::new(backend))
    }

    pub fn with_backend(backend: Arc<B>) -> Self {
        Self {
            backend,
            history: Arc::new(History::default()),
            guard: None,
            grid: Grid::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn current_route(&self) -> Route {
        self.history.current()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Unmounts the current view and mounts `route`.
    ///
    /// The task grid is guarded: without a session the visit ends on the
    /// login view, otherwise the rows are loaded.
    pub async fn visit(&mut self, route: Route) {
        if let Some(guard) = self.guard.take() {
            guard.teardown();
        }
        debug!(route = %route, "visiting");
        self.history.navigate(route);

        if route == Route::Tasks {
            self.grid = Grid::new();
            let navigator: Arc<dyn Navigator> = self.history.clone();
            let guard = SessionGuard::activate(self.backend.as_ref(), navigator).await;
            let signed_in = guard.had_session();
            self.guard = Some(guard);
            if signed_in {
                self.grid.load_tasks(self.backend.as_ref()).await;
            }
        }
    }

    pub async fn login(&mut self, form: &mut LoginForm) -> bool {
        let signed_in = form
            .submit(self.backend.as_ref(), self.history.as_ref())
            .await;
        if signed_in {
            self.visit(Route::Tasks).await;
        }
        signed_in
    }

    pub async fn signup(&mut self, form: &mut SignupForm) {
        form.submit(self.backend.as_ref()).await;
    }

    pub async fn logout(&mut self) -> Result<(), CoreError> {
        self.backend.sign_out().await
    }

    pub async fn leave_new_row(&mut self) -> MutationOutcome {
        self.grid.leave_new_row(self.backend.as_ref()).await
    }

    pub async fn commit_edit(&mut self) -> Result<MutationOutcome, CoreError> {
        self.grid.commit_edit(self.backend.as_ref()).await
    }
}
