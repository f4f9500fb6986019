// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job Log Descriptor CRUD (part of C2).

use async_trait::async_trait;
use tharsis_core::{JobId, JobLogDescriptor, Result};

#[async_trait]
pub trait JobLogDescriptorRepository: Send + Sync {
    async fn get_by_job_id(&self, job_id: JobId) -> Result<Option<JobLogDescriptor>>;

    async fn create(&self, descriptor: JobLogDescriptor) -> Result<JobLogDescriptor>;

    async fn update(&self, descriptor: JobLogDescriptor) -> Result<JobLogDescriptor>;
}
