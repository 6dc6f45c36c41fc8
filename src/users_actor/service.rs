use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, error, info, info_span, instrument, warn, Instrument};

use super::error::{StoreError, UpdateFailure};
use super::messages::{Completion, FetchOutcome, ServiceResponse, UsersRequest};
use super::state::{UsersEvent, UsersState, UsersView, FETCH_ERROR_FALLBACK};
use crate::clients::UsersClient;
use crate::domain::{User, UserId};
use crate::gateway::{GatewayError, UserGateway};

/// Capacity of the update-failure broadcast. Slow subscribers lag rather than
/// block the service.
const FAILURE_CHANNEL_CAPACITY: usize = 64;

/// Owns the paginated user collection and is the only place it changes.
///
/// Intents arrive on `receiver`. Gateway calls run in spawned tasks that post
/// their result to `completions`, so the loop keeps serving other intents
/// while remote work is outstanding.
pub struct UsersService {
    receiver: mpsc::Receiver<UsersRequest>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions: mpsc::UnboundedReceiver<Completion>,
    gateway: Arc<dyn UserGateway>,
    state: UsersState,
    view_tx: watch::Sender<UsersView>,
    failures_tx: broadcast::Sender<UpdateFailure>,
}

impl UsersService {
    pub fn new(
        buffer_size: usize,
        page_size: usize,
        gateway: Arc<dyn UserGateway>,
    ) -> (Self, UsersClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (completions_tx, completions) = mpsc::unbounded_channel();
        let state = UsersState::new(page_size);
        let (view_tx, view_rx) = watch::channel(state.view());
        let (failures_tx, _) = broadcast::channel(FAILURE_CHANNEL_CAPACITY);

        let client = UsersClient::new(sender, view_rx, failures_tx.clone());
        let service = Self {
            receiver,
            completions_tx,
            completions,
            gateway,
            state,
            view_tx,
            failures_tx,
        };
        (service, client)
    }

    #[instrument(name = "users_service", skip(self))]
    pub async fn run(mut self) {
        info!("UsersService starting");

        loop {
            tokio::select! {
                msg = self.receiver.recv() => match msg {
                    Some(UsersRequest::Shutdown) => {
                        info!("UsersService shutting down");
                        break;
                    }
                    Some(request) => self.handle_request(request),
                    None => {
                        debug!("All clients dropped");
                        break;
                    }
                },
                Some(done) = self.completions.recv() => self.handle_completion(done),
            }
        }

        info!("UsersService stopped");
    }

    fn handle_request(&mut self, request: UsersRequest) {
        match request {
            UsersRequest::SelectUser { user, respond_to } => {
                self.handle_select_user(user, respond_to);
            }
            UsersRequest::ApplyLocalUpdate { user, respond_to } => {
                let replaced = self.handle_apply_local_update(user);
                let _ = respond_to.send(Ok(replaced));
            }
            UsersRequest::FetchUsers { respond_to } => {
                if self.state.loading() {
                    warn!("Fetch rejected: another fetch is in flight");
                    let _ = respond_to.send(Err(StoreError::FetchInFlight));
                    return;
                }
                self.handle_fetch_users(respond_to);
            }
            UsersRequest::LoadMore { respond_to } => {
                if self.state.loading() {
                    debug!("Load more skipped: fetch in flight");
                    let _ = respond_to.send(Ok(FetchOutcome::Skipped));
                    return;
                }
                self.handle_fetch_users(respond_to);
            }
            UsersRequest::UpdateUser { user, respond_to } => {
                self.handle_update_user(user, respond_to);
            }
            UsersRequest::EditUser { user, respond_to } => {
                self.handle_apply_local_update(user.clone());
                self.handle_update_user(user, respond_to);
            }
            UsersRequest::GetView { respond_to } => {
                let _ = respond_to.send(Ok(self.state.view()));
            }
            UsersRequest::Shutdown => {}
            #[cfg(test)]
            UsersRequest::GetOriginalsCount { respond_to } => {
                let _ = respond_to.send(Ok(self.state.pending_originals()));
            }
        }
    }

    fn handle_completion(&mut self, done: Completion) {
        match done {
            Completion::Fetch { result, respond_to } => {
                self.handle_fetch_completed(result, respond_to);
            }
            Completion::Update {
                id,
                result,
                snapshot,
                respond_to,
            } => {
                self.handle_update_completed(id, result, snapshot, respond_to);
            }
        }
    }

    fn apply(&mut self, event: UsersEvent) -> bool {
        let changed = self.state.reduce(event);
        if changed {
            self.view_tx.send_replace(self.state.view());
        }
        changed
    }

    #[instrument(fields(user_id = ?user.as_ref().map(|u| u.id)), skip(self, user, respond_to))]
    fn handle_select_user(&mut self, user: Option<User>, respond_to: ServiceResponse<()>) {
        debug!("Processing select_user request");
        self.apply(UsersEvent::UserSelected(user));
        let _ = respond_to.send(Ok(()));
    }

    #[instrument(fields(user_id = %user.id), skip(self, user))]
    fn handle_apply_local_update(&mut self, user: User) -> bool {
        let replaced = self.apply(UsersEvent::LocalUpdateApplied(user));
        if replaced {
            debug!("Optimistic update applied");
        } else {
            debug!("User not in collection, optimistic update ignored");
        }
        replaced
    }

    #[instrument(fields(offset = self.state.offset()), skip(self, respond_to))]
    fn handle_fetch_users(&mut self, respond_to: ServiceResponse<FetchOutcome>) {
        if !self.state.has_more() {
            debug!("No more users to fetch");
            let _ = respond_to.send(Ok(FetchOutcome::Exhausted));
            return;
        }

        self.apply(UsersEvent::FetchPending);

        let offset = self.state.offset();
        let limit = self.state.page_size();
        let gateway = Arc::clone(&self.gateway);
        let completions = self.completions_tx.clone();
        info!(limit, "Fetching page");

        tokio::spawn(
            async move {
                let result = gateway.range_read(offset, limit).await;
                let _ = completions.send(Completion::Fetch { result, respond_to });
            }
            .instrument(info_span!("range_read", offset, limit)),
        );
    }

    #[instrument(skip(self, result, respond_to))]
    fn handle_fetch_completed(
        &mut self,
        result: Result<Vec<User>, GatewayError>,
        respond_to: ServiceResponse<FetchOutcome>,
    ) {
        match result {
            Ok(page) => {
                let received = page.len();
                self.apply(UsersEvent::FetchFulfilled(page));
                info!(
                    page_len = received,
                    offset = self.state.offset(),
                    has_more = self.state.has_more(),
                    "Page appended"
                );
                let _ = respond_to.send(Ok(FetchOutcome::Loaded { received }));
            }
            Err(e) => {
                let message = e
                    .message()
                    .unwrap_or_else(|| FETCH_ERROR_FALLBACK.to_string());
                error!(error = %message, "Fetch failed");
                self.apply(UsersEvent::FetchRejected(message.clone()));
                let _ = respond_to.send(Err(StoreError::Fetch(message)));
            }
        }
    }

    #[instrument(fields(user_id = %user.id), skip(self, user, respond_to))]
    fn handle_update_user(&mut self, user: User, respond_to: ServiceResponse<()>) {
        let id = user.id;
        let snapshot = self.state.take_snapshot(id);
        debug!(has_snapshot = snapshot.is_some(), "Processing update_user request");

        let gateway = Arc::clone(&self.gateway);
        let completions = self.completions_tx.clone();
        let fields = user.fields();

        tokio::spawn(
            async move {
                let result = gateway.keyed_update(id, fields).await;
                let _ = completions.send(Completion::Update {
                    id,
                    result,
                    snapshot,
                    respond_to,
                });
            }
            .instrument(info_span!("keyed_update", user_id = id)),
        );
    }

    #[instrument(fields(user_id = %id), skip(self, id, result, snapshot, respond_to))]
    fn handle_update_completed(
        &mut self,
        id: UserId,
        result: Result<(), GatewayError>,
        snapshot: Option<User>,
        respond_to: ServiceResponse<()>,
    ) {
        match result {
            Ok(()) => {
                info!("User updated remotely");
                let _ = respond_to.send(Ok(()));
            }
            Err(e) => {
                let message = e
                    .message()
                    .unwrap_or_else(|| format!("update of user {id} failed"));
                let restored = match &snapshot {
                    Some(previous) => self.apply(UsersEvent::UpdateRolledBack(previous.clone())),
                    None => false,
                };
                error!(error = %message, restored, "Update failed");

                let failure = UpdateFailure {
                    id,
                    message,
                    snapshot,
                };
                let _ = self.failures_tx.send(failure.clone());
                let _ = respond_to.send(Err(StoreError::Update(failure)));
            }
        }
    }
}
