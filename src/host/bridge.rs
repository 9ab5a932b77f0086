//! Stdio bridge to the host browser
//!
//! Speaks the newline-delimited JSON protocol on a reader/writer pair
//! (stdin/stdout in production). A reader task routes responses to their
//! pending requests by id and forwards everything else to the event
//! channel. Stdout carries the protocol; logs must stay on stderr.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, oneshot};

use super::protocol::{parse_line, Command, HostEvent, Inbound, Query, Request, Response};
use super::{
    ActionSurface, HostApi, HostError, PlatformInfo, TabId, TabSnapshot, ThemeInfo,
};

type PendingMap = Mutex<HashMap<u64, oneshot::Sender<Result<Value, HostError>>>>;

/// Connection to the host browser over a line-oriented JSON transport.
pub struct HostBridge {
    writer: tokio::sync::Mutex<Box<dyn AsyncWrite + Send + Unpin>>,
    pending: PendingMap,
    next_id: AtomicU64,
}

impl HostBridge {
    /// Attach to stdin/stdout.
    pub fn stdio() -> (Arc<Self>, mpsc::UnboundedReceiver<HostEvent>) {
        Self::spawn(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }

    /// Attach to an arbitrary transport and start the reader task.
    pub fn spawn<R, W>(reader: R, writer: W) -> (Arc<Self>, mpsc::UnboundedReceiver<HostEvent>)
    where
        R: AsyncBufRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let bridge = Arc::new(Self {
            writer: tokio::sync::Mutex::new(Box::new(writer)),
            pending: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        });

        let reader_bridge = Arc::clone(&bridge);
        tokio::spawn(async move {
            reader_bridge.read_loop(reader, events_tx).await;
        });

        (bridge, events_rx)
    }

    async fn read_loop<R: AsyncBufRead + Unpin>(
        self: Arc<Self>,
        reader: R,
        events_tx: mpsc::UnboundedSender<HostEvent>,
    ) {
        let mut lines = reader.lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match parse_line(&line) {
                        Ok(Inbound::Response(response)) => self.resolve(response),
                        Ok(Inbound::Event(event)) => {
                            if events_tx.send(event).is_err() {
                                break;
                            }
                        }
                        Err(e) => tracing::warn!("skipping malformed bridge line: {}", e),
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!("bridge read failed: {}", e);
                    break;
                }
            }
        }

        // Fail outstanding requests so callers see Closed instead of
        // waiting forever.
        self.pending.lock().unwrap().clear();
        tracing::info!("host bridge closed");
    }

    fn resolve(&self, response: Response) {
        let sender = self.pending.lock().unwrap().remove(&response.reply_to);
        match sender {
            Some(tx) => {
                let outcome = match response.error {
                    Some(message) => Err(HostError::Rejected(message)),
                    None => Ok(response.result),
                };
                let _ = tx.send(outcome);
            }
            None => tracing::debug!("unmatched bridge reply id {}", response.reply_to),
        }
    }

    async fn send_value(&self, value: Value) -> Result<(), HostError> {
        let mut line = serde_json::to_vec(&value)?;
        line.push(b'\n');
        let mut writer = self.writer.lock().await;
        writer.write_all(&line).await?;
        writer.flush().await?;
        Ok(())
    }

    async fn command(&self, command: Command) -> Result<(), HostError> {
        self.send_value(serde_json::to_value(&command)?).await
    }

    async fn request<T: DeserializeOwned>(&self, query: Query) -> Result<T, HostError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().insert(id, tx);

        let request = Request { id, query };
        if let Err(e) = self.send_value(serde_json::to_value(&request)?).await {
            self.pending.lock().unwrap().remove(&id);
            return Err(e);
        }

        let value = rx.await.map_err(|_| HostError::Closed)??;
        Ok(serde_json::from_value(value)?)
    }
}

#[async_trait]
impl HostApi for HostBridge {
    async fn query_tabs(&self) -> Result<Vec<TabSnapshot>, HostError> {
        self.request(Query::Tabs).await
    }

    async fn get_tab(&self, tab_id: TabId) -> Result<TabSnapshot, HostError> {
        self.request(Query::Tab { tab_id }).await
    }

    async fn active_theme(&self) -> Result<Option<ThemeInfo>, HostError> {
        self.request(Query::ActiveTheme).await
    }

    async fn platform_info(&self) -> Result<PlatformInfo, HostError> {
        self.request(Query::PlatformInfo).await
    }

    async fn set_icon(
        &self,
        surface: ActionSurface,
        tab_id: TabId,
        path: &str,
    ) -> Result<(), HostError> {
        self.command(Command::SetIcon {
            surface,
            tab_id,
            path: path.to_string(),
        })
        .await
    }

    async fn set_title(
        &self,
        surface: ActionSurface,
        tab_id: TabId,
        title: &str,
    ) -> Result<(), HostError> {
        self.command(Command::SetTitle {
            surface,
            tab_id,
            title: title.to_string(),
        })
        .await
    }

    async fn show_action(&self, tab_id: TabId) -> Result<(), HostError> {
        self.command(Command::ShowAction { tab_id }).await
    }

    async fn reload_tab(
        &self,
        tab_id: Option<TabId>,
        bypass_cache: bool,
    ) -> Result<(), HostError> {
        self.command(Command::ReloadTab {
            tab_id,
            bypass_cache,
        })
        .await
    }

    async fn inject_stop(&self, tab_id: TabId) -> Result<(), HostError> {
        self.command(Command::InjectStop { tab_id }).await
    }

    async fn clear_cache(&self) -> Result<(), HostError> {
        self.command(Command::ClearCache).await
    }

    async fn create_menu(&self, id: &str, title: &str) -> Result<(), HostError> {
        self.command(Command::CreateMenu {
            id: id.to_string(),
            title: title.to_string(),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::LoadStatus;
    use tokio_test::{assert_err, assert_ok};

    /// Bridge wired to an in-memory transport, plus the host's end.
    fn connect() -> (
        Arc<HostBridge>,
        mpsc::UnboundedReceiver<HostEvent>,
        BufReader<tokio::io::ReadHalf<tokio::io::DuplexStream>>,
        tokio::io::WriteHalf<tokio::io::DuplexStream>,
    ) {
        let (ours, theirs) = tokio::io::duplex(4096);
        let (read_half, write_half) = tokio::io::split(ours);
        let (bridge, events_rx) = HostBridge::spawn(BufReader::new(read_half), write_half);
        let (host_read, host_write) = tokio::io::split(theirs);
        (bridge, events_rx, BufReader::new(host_read), host_write)
    }

    async fn host_write(
        writer: &mut tokio::io::WriteHalf<tokio::io::DuplexStream>,
        line: &str,
    ) {
        writer.write_all(line.as_bytes()).await.unwrap();
        writer.write_all(b"\n").await.unwrap();
    }

    #[tokio::test]
    async fn test_request_response_round_trip() {
        let (bridge, _events, mut host_read, mut host_write_half) = connect();

        let host = tokio::spawn(async move {
            let mut line = String::new();
            host_read.read_line(&mut line).await.unwrap();
            let request: Value = serde_json::from_str(&line).unwrap();
            assert_eq!(request["query"], "tabs");
            let id = request["id"].as_u64().unwrap();
            host_write(
                &mut host_write_half,
                &format!(
                    r#"{{"reply_to": {}, "result": [{{"id": 1, "status": "loading"}}]}}"#,
                    id
                ),
            )
            .await;
        });

        let tabs = tokio_test::assert_ok!(bridge.query_tabs().await);
        assert_eq!(
            tabs,
            vec![TabSnapshot {
                id: 1,
                status: LoadStatus::Loading,
            }]
        );
        host.await.unwrap();
    }

    #[tokio::test]
    async fn test_out_of_order_responses_correlate_by_id() {
        let (bridge, _events, mut host_read, mut host_write_half) = connect();

        let host = tokio::spawn(async move {
            let mut first = String::new();
            host_read.read_line(&mut first).await.unwrap();
            let mut second = String::new();
            host_read.read_line(&mut second).await.unwrap();

            let first: Value = serde_json::from_str(&first).unwrap();
            let second: Value = serde_json::from_str(&second).unwrap();
            assert_eq!(first["query"], "platform_info");
            assert_eq!(second["query"], "active_theme");

            // Answer in reverse order.
            host_write(
                &mut host_write_half,
                &format!(r#"{{"reply_to": {}, "result": null}}"#, second["id"]),
            )
            .await;
            host_write(
                &mut host_write_half,
                &format!(
                    r#"{{"reply_to": {}, "result": {{"os": "mac", "prefers_dark": true}}}}"#,
                    first["id"]
                ),
            )
            .await;
        });

        let platform_fut = bridge.platform_info();
        let theme_fut = bridge.active_theme();
        let (platform, theme) = tokio::join!(platform_fut, theme_fut);

        assert_eq!(platform.unwrap().os, crate::host::Os::Mac);
        assert_eq!(theme.unwrap(), None);
        host.await.unwrap();
    }

    #[tokio::test]
    async fn test_error_response_is_rejected() {
        let (bridge, _events, mut host_read, mut host_write_half) = connect();

        let host = tokio::spawn(async move {
            let mut line = String::new();
            host_read.read_line(&mut line).await.unwrap();
            let request: Value = serde_json::from_str(&line).unwrap();
            host_write(
                &mut host_write_half,
                &format!(r#"{{"reply_to": {}, "error": "no such tab"}}"#, request["id"]),
            )
            .await;
        });

        let err = bridge.get_tab(99).await.unwrap_err();
        assert!(matches!(err, HostError::Rejected(msg) if msg == "no such tab"));
        host.await.unwrap();
    }

    #[tokio::test]
    async fn test_events_are_forwarded() {
        let (_bridge, mut events, _host_read, mut host_write_half) = connect();

        host_write(
            &mut host_write_half,
            r#"{"event": "tab_created", "tab": {"id": 4, "status": "complete"}}"#,
        )
        .await;

        let event = events.recv().await.unwrap();
        assert_eq!(
            event,
            HostEvent::TabCreated {
                tab: TabSnapshot {
                    id: 4,
                    status: LoadStatus::Complete,
                },
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_lines_are_skipped() {
        let (_bridge, mut events, _host_read, mut host_write_half) = connect();

        host_write(&mut host_write_half, "{not json").await;
        host_write(&mut host_write_half, r#"{"event": "command_invoked", "name": "x"}"#).await;

        let event = events.recv().await.unwrap();
        assert_eq!(
            event,
            HostEvent::CommandInvoked {
                name: "x".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_commands_hit_the_wire() {
        let (bridge, _events, mut host_read, _host_write_half) = connect();

        bridge
            .set_icon(ActionSurface::Toolbar, 2, "data/ltr/stop_dark.svg")
            .await
            .unwrap();

        let mut line = String::new();
        host_read.read_line(&mut line).await.unwrap();
        let cmd: Command = serde_json::from_str(&line).unwrap();
        assert_eq!(
            cmd,
            Command::SetIcon {
                surface: ActionSurface::Toolbar,
                tab_id: 2,
                path: "data/ltr/stop_dark.svg".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_closed_host_fails_pending_request() {
        let (bridge, _events, host_read, host_write_half) = connect();

        let pending = tokio::spawn(async move { bridge.query_tabs().await });
        // Give the request time to land in the pending map, then close
        // the host end.
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
        drop(host_read);
        drop(host_write_half);

        tokio_test::assert_err!(pending.await.unwrap());
    }
}
