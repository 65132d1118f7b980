#![allow(dead_code)]

pub mod in_memory_job_client;
pub mod mock_engine;
