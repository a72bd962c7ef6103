//! # Agent Service Map
//!
//! Service URL derivation and plugin mounting on a provisioned ledger.

#[cfg(test)]
mod tests {
    use crate::integration::{init_tracing, TestLedger};
    use ledger_agent::{
        derive_service_url, LedgerAgent, LedgerAgentApi, LedgerAgentConfig, LedgerAgentOptions,
        LedgerError, PluginCapability, RouteConfig, StaticPluginRegistry, CORE_SERVICES,
    };

    fn registry() -> StaticPluginRegistry {
        StaticPluginRegistry::new()
            .with_plugin(
                "recordQuery",
                PluginCapability::new("RecordQueryService").with_sub_route("records"),
            )
            .unwrap()
            .with_plugin("HTTPSigner", PluginCapability::new("SignerService"))
            .unwrap()
            .with_plugin("configShadow", PluginCapability::new("ledgerConfigService"))
            .unwrap()
    }

    fn options(plugins: &[&str]) -> LedgerAgentOptions {
        LedgerAgentOptions {
            id: Some("urn:uuid:ABC123".to_string()),
            plugins: plugins.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_service_url_determinism() {
        let url = derive_service_url(
            "https://example.com",
            "/ledger-agents/:agentId/blocks",
            "urn:uuid:ABC123",
        );
        assert_eq!(url, "https://example.com/ledger-agents/ABC123/blocks");
    }

    #[tokio::test]
    async fn test_provisioned_agent_publishes_core_services() {
        init_tracing();
        let ledger = TestLedger::provision(1).await.unwrap();
        let agent = &ledger.agent;

        for service_type in CORE_SERVICES {
            let url = agent.service_url(service_type).unwrap();
            assert!(url.starts_with("https://example.com/ledger-agents/"), "{url}");
            assert!(!url.contains("urn:uuid:"), "{url}");
        }

        let doc = serde_json::to_value(agent.to_document()).unwrap();
        assert_eq!(doc["public"], false);
        assert_eq!(doc["owner"], "did:example:regular-user");
        assert_eq!(doc["ledgerNode"], "node-0");
    }

    #[tokio::test]
    async fn test_plugins_mount_in_order() {
        init_tracing();
        let ledger = TestLedger::provision(1).await.unwrap();
        let agent = LedgerAgent::new(
            options(&["recordQuery", "HTTPSigner"]),
            ledger.agent.node().clone(),
            &RouteConfig::with_base_uri("https://example.com"),
            &registry(),
        )
        .unwrap();

        let status = "https://example.com/ledger-agents/ABC123";
        let mounts = agent.plugin_mounts();
        assert_eq!(mounts.len(), 2);
        assert_eq!(mounts[0].url, format!("{status}/plugins/record-query"));
        assert_eq!(
            mounts[0].sub_routes,
            vec![format!("{status}/plugins/record-query/records")]
        );
        assert_eq!(mounts[1].url, format!("{status}/plugins/http-signer"));
        assert_eq!(
            agent.service_url("SignerService"),
            Some(format!("{status}/plugins/http-signer").as_str())
        );
        assert_eq!(agent.services().len(), CORE_SERVICES.len() + 2);
        assert_eq!(agent.plugins(), ["recordQuery", "HTTPSigner"]);
    }

    #[tokio::test]
    async fn test_plugin_conflict_rejected() {
        init_tracing();
        let ledger = TestLedger::provision(1).await.unwrap();
        let config = LedgerAgentConfig::for_testing();

        let result = LedgerAgent::new(
            options(&["recordQuery", "configShadow"]),
            ledger.agent.node().clone(),
            &config.routes,
            &registry(),
        );
        assert_eq!(
            result.err(),
            Some(LedgerError::ServiceTypeConflict {
                service_type: "ledgerConfigService".to_string(),
                plugin: "configShadow".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_unresolved_plugin_rejected() {
        let ledger = TestLedger::provision(1).await.unwrap();
        let result = LedgerAgent::new(
            options(&["recordQuery", "unknownPlugin"]),
            ledger.agent.node().clone(),
            &RouteConfig::default(),
            &registry(),
        );
        assert!(matches!(
            result,
            Err(LedgerError::PluginResolutionFailed(name)) if name == "unknownPlugin"
        ));
    }
}
