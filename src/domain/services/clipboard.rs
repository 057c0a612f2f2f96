use anyhow::anyhow;
use anyhow::Result;
use once_cell::sync::OnceCell;
use tokio::sync::mpsc;
use tokio::sync::oneshot;

struct CopyRequest {
    text: String,
    done: oneshot::Sender<Result<()>>,
}

static REQUESTS: OnceCell<mpsc::UnboundedSender<CopyRequest>> = OnceCell::new();

/// The system clipboard lives on one task for the whole process. Callers
/// queue text and wait for the write to be acknowledged.
pub struct ClipboardService {}

impl ClipboardService {
    pub async fn start() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<CopyRequest>();
        REQUESTS
            .set(tx)
            .map_err(|_| return anyhow!("Clipboard service is already running."))?;
        let mut clipboard = arboard::Clipboard::new()?;

        while let Some(request) = rx.recv().await {
            let res = clipboard
                .set_text(request.text)
                .map_err(|err| return anyhow!("Failed to write to the clipboard: {err}"));
            if let Err(err) = &res {
                tracing::error!(error = ?err, "Clipboard write failed");
            }
            // The caller may have stopped waiting.
            let _ = request.done.send(res);
        }

        return Ok(());
    }

    /// Fails when no clipboard can be opened, e.g. without a display server.
    pub fn healthcheck() -> Result<()> {
        if REQUESTS.get().is_none() {
            arboard::Clipboard::new()?;
        }

        return Ok(());
    }

    pub async fn copy(text: String) -> Result<()> {
        let requests = REQUESTS
            .get()
            .ok_or_else(|| return anyhow!("Clipboard is not available."))?;

        let (done, ack) = oneshot::channel();
        requests
            .send(CopyRequest { text, done })
            .map_err(|_| return anyhow!("Clipboard service has stopped."))?;

        return ack
            .await
            .map_err(|_| return anyhow!("Clipboard service has stopped."))?;
    }
}
