//! Per-connection handler: hello, then event loop.
//!
//! Each accepted connection gets its own Tokio task running this handler:
//!   1. Upgrade to WebSocket
//!   2. Receive `hello { client_id }` (5 s limit) → build a scoped shell
//!   3. Restore the session and send the first frame
//!   4. Loop: receive event → apply to the shell → send a frame or error

use std::sync::Arc;
use std::time::Duration;

use skygarden_protocol::{AuthRequest, Codec, Envelope, ProtocolError};
use skygarden_session::{Authenticator, SessionStore};
use skygarden_storage::{ScopedStorage, Storage};
use tokio::net::TcpStream;

use crate::connection::Connection;
use crate::server::ServerState;
use crate::{ClientMessage, ServerMessage, Shell, SkygardenError};

const HELLO_TIMEOUT: Duration = Duration::from_secs(5);

type ConnShell<A, S> = Shell<Arc<A>, ScopedStorage<S>>;

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<A, S>(
    stream: TcpStream,
    state: Arc<ServerState<A, S>>,
) -> Result<(), SkygardenError>
where
    A: Authenticator,
    S: Storage,
{
    let mut conn = Connection::accept(stream).await?;
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "accepted connection");

    let mut seq: u64 = 0;

    // --- Step 1: hello ---
    let (client_id, storage) = match perform_hello(&mut conn, &state).await {
        Ok(accepted) => accepted,
        Err(e) => {
            let code = e.status_code();
            send_error(&mut conn, &state, code, &e.to_string(), next_seq(&mut seq)).await?;
            conn.close().await?;
            return Err(e);
        }
    };

    let store = SessionStore::new(Arc::clone(&state.auth), storage, state.config.session.clone());
    let mut shell: ConnShell<A, S> = Shell::new(store, state.routes.clone());

    tracing::info!(%conn_id, %client_id, "client connected");

    // --- Step 2: restore and first frame ---
    shell.boot().await;
    send_frame(&mut conn, &state, &mut shell, next_seq(&mut seq)).await?;

    // --- Step 3: event loop ---
    loop {
        let text = match tokio::time::timeout(state.config.idle_timeout(), conn.recv()).await {
            Ok(Ok(Some(text))) => text,
            Ok(Ok(None)) => {
                tracing::info!(%conn_id, %client_id, "connection closed cleanly");
                break;
            }
            Ok(Err(e)) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
            Err(_) => {
                tracing::info!(%conn_id, %client_id, "connection idle; closing");
                conn.close().await?;
                break;
            }
        };

        let msg: ClientMessage = match state.codec.decode(&text) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "undecodable message");
                send_error(&mut conn, &state, 400, &e.to_string(), next_seq(&mut seq)).await?;
                continue;
            }
        };

        match apply(&mut shell, msg).await {
            Ok(()) => send_frame(&mut conn, &state, &mut shell, next_seq(&mut seq)).await?,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "event rejected");
                send_error(&mut conn, &state, e.status_code(), &e.to_string(), next_seq(&mut seq))
                    .await?;
            }
        }
    }

    Ok(())
}

/// Waits for `hello` and scopes storage to its client id.
///
/// The id must work as a storage scope for the configured session key,
/// so a client that could never persist its session is turned away here.
async fn perform_hello<A, S>(
    conn: &mut Connection,
    state: &ServerState<A, S>,
) -> Result<(String, ScopedStorage<S>), SkygardenError>
where
    A: Authenticator,
    S: Storage,
{
    let text = match tokio::time::timeout(HELLO_TIMEOUT, conn.recv()).await {
        Ok(Ok(Some(text))) => text,
        Ok(Ok(None)) => {
            let err = ProtocolError::InvalidMessage("connection closed before hello".into());
            return Err(err.into());
        }
        Ok(Err(e)) => return Err(e),
        Err(_) => return Err(ProtocolError::InvalidMessage("hello timed out".into()).into()),
    };

    match state.codec.decode::<ClientMessage>(&text)? {
        ClientMessage::Hello { client_id } => {
            let storage = ScopedStorage::for_key(
                Arc::clone(&state.storage),
                client_id.as_str(),
                &state.config.session.storage_key,
            )
            .map_err(|e| ProtocolError::InvalidMessage(format!("client_id rejected: {e}")))?;
            Ok((client_id, storage))
        }
        _ => Err(ProtocolError::InvalidMessage("first message must be hello".into()).into()),
    }
}

/// Applies one client event to the shell.
///
/// Failed sign-in, sign-up and sign-out are not errors here: the store
/// records them in the session and the next frame shows them.
async fn apply<A, S>(shell: &mut ConnShell<A, S>, msg: ClientMessage) -> Result<(), SkygardenError>
where
    A: Authenticator,
    S: Storage,
{
    match msg {
        ClientMessage::Hello { .. } => {
            return Err(ProtocolError::InvalidMessage("hello already received".into()).into());
        }
        ClientMessage::Login(req) => {
            shell.submit(AuthRequest::Login(req)).await;
        }
        ClientMessage::Register(req) => {
            shell.submit(AuthRequest::Register(req)).await;
        }
        ClientMessage::Logout => {
            shell.logout().await;
        }
        ClientMessage::SwitchRole { role } => {
            shell.switch_role(&role).await?;
        }
        ClientMessage::Navigate { path } => shell.navigate(&path),
        ClientMessage::SelectPanel { panel } => shell.select_panel(&panel)?,
        ClientMessage::SelectTab { tab } => shell.select_tab(&tab)?,
        ClientMessage::EditDraft { field, value } => shell.edit_draft(&field, &value)?,
        ClientMessage::Refresh => {}
    }
    Ok(())
}

async fn send_frame<A, S>(
    conn: &mut Connection,
    state: &ServerState<A, S>,
    shell: &mut ConnShell<A, S>,
    seq: u64,
) -> Result<(), SkygardenError>
where
    A: Authenticator,
    S: Storage,
{
    let envelope = Envelope {
        seq,
        payload: ServerMessage::Frame(shell.render()),
    };
    conn.send(state.codec.encode(&envelope)?).await
}

async fn send_error<A, S>(
    conn: &mut Connection,
    state: &ServerState<A, S>,
    code: u16,
    message: &str,
    seq: u64,
) -> Result<(), SkygardenError> {
    let envelope = Envelope {
        seq,
        payload: ServerMessage::Error {
            code,
            message: message.to_string(),
        },
    };
    conn.send(state.codec.encode(&envelope)?).await
}

/// Returns the current sequence number and advances it.
fn next_seq(seq: &mut u64) -> u64 {
    let current = *seq;
    *seq += 1;
    current
}
