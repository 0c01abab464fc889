// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Background content loading.
//!
//! Each load runs on its own thread and reports back over a channel. The UI
//! thread polls the channel; dropping a [`PendingLoad`] abandons the load and
//! the worker's send silently fails.

use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

use crate::error::LoadError;
use crate::models::file::{FileDescriptor, MediaKind};
use crate::render::LoadTicket;

use super::source::{ContentSource, LoadedContent};

/// Result of one background load.
#[derive(Debug)]
pub struct LoadMessage {
    pub ticket: LoadTicket,
    pub result: Result<LoadedContent, LoadError>,
}

/// Receiving end of an in-flight load.
#[derive(Debug)]
pub struct PendingLoad {
    ticket: LoadTicket,
    receiver: Receiver<LoadMessage>,
}

impl PendingLoad {
    pub fn ticket(&self) -> LoadTicket {
        self.ticket
    }

    /// Non-blocking check for completion.
    pub fn try_take(&self) -> Option<LoadMessage> {
        match self.receiver.try_recv() {
            Ok(msg) => Some(msg),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(self.lost()),
        }
    }

    /// Block up to `timeout` for completion.
    pub fn wait(&self, timeout: Duration) -> Option<LoadMessage> {
        match self.receiver.recv_timeout(timeout) {
            Ok(msg) => Some(msg),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(self.lost()),
        }
    }

    fn lost(&self) -> LoadMessage {
        LoadMessage {
            ticket: self.ticket,
            result: Err(LoadError::fetch("", "loader thread exited without a result")),
        }
    }
}

/// Spawns background loads against a shared content source.
#[derive(Clone)]
pub struct Loader {
    source: Arc<dyn ContentSource>,
}

impl Loader {
    pub fn new(source: impl ContentSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    pub fn from_arc(source: Arc<dyn ContentSource>) -> Self {
        Self { source }
    }

    /// Start fetching `file` on a background thread.
    pub fn spawn(&self, file: FileDescriptor, ticket: LoadTicket) -> PendingLoad {
        let (sender, receiver) = channel();
        let source = Arc::clone(&self.source);

        std::thread::spawn(move || {
            let result = fetch_content(source.as_ref(), &file);
            let _ = sender.send(LoadMessage { ticket, result });
        });

        PendingLoad { ticket, receiver }
    }
}

/// Fetch bytes and, for time-based media, metadata.
///
/// Source errors become [`LoadError::Fetch`]; probe errors are media-level
/// failures and become [`LoadError::Media`].
pub fn fetch_content(source: &dyn ContentSource, file: &FileDescriptor) -> Result<LoadedContent, LoadError> {
    let bytes = source
        .fetch(file)
        .map_err(|e| LoadError::fetch(&file.source_location, format!("{:#}", e)))?;
    let metadata = match file.media_kind {
        MediaKind::Audio | MediaKind::Video => source
            .probe(file)
            .map_err(|e| LoadError::media(&file.name, format!("{:#}", e)))?,
        _ => None,
    };
    Ok(LoadedContent { bytes, metadata })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::source::{MediaMetadata, MemorySource};
    use anyhow::anyhow;

    struct Unplayable;

    impl ContentSource for Unplayable {
        fn fetch(&self, _file: &FileDescriptor) -> anyhow::Result<Vec<u8>> {
            Ok(vec![1, 2, 3])
        }

        fn probe(&self, _file: &FileDescriptor) -> anyhow::Result<Option<MediaMetadata>> {
            Err(anyhow!("unsupported codec"))
        }
    }

    #[test]
    fn test_spawn_delivers_result() {
        let loader = Loader::new(MemorySource::new().with("a.txt", "hi"));
        let file = FileDescriptor::new("1", "a.txt", MediaKind::Text, "a.txt");
        let pending = loader.spawn(file, LoadTicket { generation: 7 });

        let msg = pending.wait(Duration::from_secs(5)).unwrap();
        assert_eq!(msg.ticket.generation, 7);
        assert_eq!(msg.result.unwrap().bytes, b"hi");
    }

    #[test]
    fn test_missing_content_is_fetch_error() {
        let file = FileDescriptor::new("1", "a.txt", MediaKind::Text, "missing");
        let err = fetch_content(&MemorySource::new(), &file).unwrap_err();
        assert!(matches!(err, LoadError::Fetch { .. }));
    }

    #[test]
    fn test_probe_failure_is_media_error() {
        let video = FileDescriptor::new("1", "a.mp4", MediaKind::Video, "a.mp4");
        let err = fetch_content(&Unplayable, &video).unwrap_err();
        assert!(matches!(err, LoadError::Media { ref reason, .. } if reason.contains("unsupported codec")));

        let text = FileDescriptor::new("2", "a.txt", MediaKind::Text, "a.txt");
        assert!(fetch_content(&Unplayable, &text).is_ok());
    }
}
