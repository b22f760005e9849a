use crate::domain::gateway::{
    GatewayError, ProcessRequest, ProcessResponse, RegisterRequest, RegisterResponse,
};
use crate::domain::ports::GatewayClient;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

type Reply<T> = std::result::Result<T, GatewayError>;

#[derive(Default)]
struct Script {
    register: VecDeque<Reply<RegisterResponse>>,
    process: VecDeque<Reply<ProcessResponse>>,
    register_requests: Vec<RegisterRequest>,
    process_requests: Vec<ProcessRequest>,
}

/// An in-process gateway that replays queued replies and records every
/// request it receives.
///
/// When a queue runs dry the call succeeds: registration hands out a fresh
/// transaction id and processing answers `OK`.
#[derive(Default, Clone)]
pub struct ScriptedGateway {
    script: Arc<Mutex<Script>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push_register(&self, reply: Reply<RegisterResponse>) {
        self.script.lock().await.register.push_back(reply);
    }

    pub async fn push_process(&self, reply: Reply<ProcessResponse>) {
        self.script.lock().await.process.push_back(reply);
    }

    pub async fn register_requests(&self) -> Vec<RegisterRequest> {
        self.script.lock().await.register_requests.clone()
    }

    pub async fn process_requests(&self) -> Vec<ProcessRequest> {
        self.script.lock().await.process_requests.clone()
    }
}

#[async_trait]
impl GatewayClient for ScriptedGateway {
    async fn register(&self, request: &RegisterRequest) -> Reply<RegisterResponse> {
        let mut script = self.script.lock().await;
        script.register_requests.push(request.clone());
        script.register.pop_front().unwrap_or_else(|| {
            Ok(RegisterResponse {
                transaction_id: Uuid::new_v4().simple().to_string(),
            })
        })
    }

    async fn process(&self, request: &ProcessRequest) -> Reply<ProcessResponse> {
        let mut script = self.script.lock().await;
        script.process_requests.push(request.clone());
        script
            .process
            .pop_front()
            .unwrap_or_else(|| Ok(ProcessResponse::ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gateway::GatewayFault;
    use crate::domain::transaction::Operation;

    #[tokio::test]
    async fn test_replays_queue_then_defaults() {
        let gateway = ScriptedGateway::new();
        gateway
            .push_process(Err(GatewayFault::new("99", "Refused").into()))
            .await;

        let request = ProcessRequest::new(Operation::Auth, "t1".to_string(), None);
        assert!(gateway.process(&request).await.is_err());
        assert_eq!(
            gateway.process(&request).await.unwrap(),
            ProcessResponse::ok()
        );
        assert_eq!(gateway.process_requests().await.len(), 2);
    }
}
