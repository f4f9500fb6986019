// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory blob backend, standing in for the cloud object store in
//! production deployments.

use async_trait::async_trait;
use std::collections::HashMap;
use tharsis_core::Result;

use crate::log_store::{BlobStore, ContentRange};

#[derive(Default)]
pub struct InMemoryBlobStore {
    objects: parking_lot::Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn download_object(&self, key: &str, range: Option<ContentRange>) -> Result<Vec<u8>> {
        let objects = self.objects.lock();
        let Some(object) = objects.get(key) else {
            return Ok(Vec::new());
        };
        match range {
            Some(r) => {
                let start = (r.start as usize).min(object.len());
                let end = start.saturating_add(r.len as usize).min(object.len());
                Ok(object[start..end].to_vec())
            }
            None => Ok(object.clone()),
        }
    }

    async fn upload_object(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        self.objects.lock().insert(key.to_string(), bytes);
        Ok(())
    }
}

#[cfg(test)]
#[path = "blob_tests.rs"]
mod tests;
