use std::io;

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use eyre::Result;
use rbos_primitives::cart::CartState;
use rbos_primitives::conflict::ConflictReport;
use rbos_primitives::token::CartToken;
use tokio::fs;
use tracing::warn;

use crate::errors::StoreError;
use crate::traits::CartStorage;
use crate::{codec, CART_SLOT, PENDING_CONFLICTS_SLOT};

/// File-backed cart storage: one JSON file per slot inside a directory.
#[derive(Clone, Debug)]
pub struct FileCartStorage {
    dir: Utf8PathBuf,
}

impl FileCartStorage {
    #[must_use]
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    fn slot_path(&self, slot: &str) -> Utf8PathBuf {
        self.dir.join(format!("{slot}.json"))
    }

    async fn read_slot(&self, slot: &str) -> Option<String> {
        let path = self.slot_path(slot);

        match fs::read_to_string(&path).await {
            Ok(raw) => Some(raw),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!(%err, slot, "failed to read slot; treating as empty");
                None
            }
        }
    }

    async fn write_slot(&self, slot: &'static str, raw: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| StoreError::Write { slot, source })?;

        fs::write(self.slot_path(slot), raw)
            .await
            .map_err(|source| StoreError::Write { slot, source })
    }
}

#[async_trait]
impl CartStorage for FileCartStorage {
    async fn load(&self) -> (CartState, Option<CartToken>) {
        let Some(raw) = self.read_slot(CART_SLOT).await else {
            return (CartState::default(), None);
        };

        codec::decode_cart_slot(&raw).unwrap_or_else(|| {
            warn!(slot = CART_SLOT, "malformed cart slot; starting empty");
            (CartState::default(), None)
        })
    }

    async fn save(&self, state: &CartState, token: Option<&CartToken>) -> Result<()> {
        let raw = codec::encode_cart_slot(state, token)?;
        self.write_slot(CART_SLOT, &raw).await?;
        Ok(())
    }

    async fn take_pending_conflicts(&self) -> Option<ConflictReport> {
        let raw = self.read_slot(PENDING_CONFLICTS_SLOT).await?;

        if let Err(err) = fs::remove_file(self.slot_path(PENDING_CONFLICTS_SLOT)).await {
            if err.kind() != io::ErrorKind::NotFound {
                warn!(%err, "failed to clear pending-conflicts slot");
            }
        }

        codec::decode_conflicts(&raw)
    }

    async fn stash_pending_conflicts(&self, report: &ConflictReport) -> Result<()> {
        let raw = codec::encode_conflicts(report)?;
        self.write_slot(PENDING_CONFLICTS_SLOT, &raw).await?;
        Ok(())
    }
}
