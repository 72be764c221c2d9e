//! Descriptors for the supported Elasticsearch APIs.
//!
//! Every constant is an [`Endpoint`]; call [`Endpoint::request`] on it or hand
//! it to the client's `send`. [`find`] looks one up by its API name.

use crate::{BodyRule, Endpoint, Method};

/// `GET /` - cluster name and version.
pub const INFO: Endpoint = Endpoint::new("info", Method::Get, &["/"]);

/// `GET|POST /{index}/_count`
pub const COUNT: Endpoint = Endpoint::new("count", Method::Get, &["/{index}/_count", "/_count"])
    .with_params(&[
        "ignore_unavailable",
        "ignore_throttled",
        "allow_no_indices",
        "expand_wildcards",
        "min_score",
        "preference",
        "routing",
        "q",
        "analyzer",
        "analyze_wildcard",
        "default_operator",
        "df",
        "lenient",
        "terminate_after",
    ])
    .with_body(BodyRule::OptionalSwitch(Method::Post));

const GET_PARAMS: &[&str] = &[
    "preference",
    "realtime",
    "refresh",
    "routing",
    "_source",
    "_source_excludes",
    "_source_includes",
    "stored_fields",
    "version",
    "version_type",
];

/// `GET /{index}/_doc/{id}`
pub const GET: Endpoint =
    Endpoint::new("get", Method::Get, &["/{index}/_doc/{id}"]).with_params(GET_PARAMS);

/// `HEAD /{index}/_doc/{id}`
pub const EXISTS: Endpoint =
    Endpoint::new("exists", Method::Head, &["/{index}/_doc/{id}"]).with_params(GET_PARAMS);

/// `GET /{index}/_source/{id}`
pub const GET_SOURCE: Endpoint =
    Endpoint::new("get_source", Method::Get, &["/{index}/_source/{id}"]).with_params(GET_PARAMS);

/// `GET /{index}/_search_shards`
pub const SEARCH_SHARDS: Endpoint = Endpoint::new("search_shards", Method::Get, &[
    "/{index}/_search_shards",
    "/_search_shards",
])
.with_params(&[
    "preference",
    "routing",
    "local",
    "ignore_unavailable",
    "allow_no_indices",
    "expand_wildcards",
]);

/// `GET|POST /{index}/_rank_eval`
pub const RANK_EVAL: Endpoint = Endpoint::new("rank_eval", Method::Get, &[
    "/{index}/_rank_eval",
    "/_rank_eval",
])
.with_params(&[
    "ignore_unavailable",
    "allow_no_indices",
    "expand_wildcards",
    "search_type",
])
.with_body(BodyRule::OptionalSwitch(Method::Post));

/// `DELETE /_scripts/{id}`
pub const DELETE_SCRIPT: Endpoint =
    Endpoint::new("delete_script", Method::Delete, &["/_scripts/{id}"])
        .with_params(&["timeout", "master_timeout"]);

/// `indices.*` APIs.
pub mod indices {
    use super::{Endpoint, Method};

    /// `POST /{index}/_open`
    pub const OPEN: Endpoint = Endpoint::new("indices.open", Method::Post, &["/{index}/_open"])
        .with_params(&[
            "timeout",
            "master_timeout",
            "ignore_unavailable",
            "allow_no_indices",
            "expand_wildcards",
            "wait_for_active_shards",
        ]);

    /// `DELETE /_template/{name}`
    pub const DELETE_TEMPLATE: Endpoint =
        Endpoint::new("indices.delete_template", Method::Delete, &["/_template/{name}"])
            .with_params(&["timeout", "master_timeout"]);
}

/// `cluster.*` APIs.
pub mod cluster {
    use super::{BodyRule, Endpoint, Method};

    /// `GET|POST /_cluster/allocation/explain`
    pub const ALLOCATION_EXPLAIN: Endpoint = Endpoint::new(
        "cluster.allocation_explain",
        Method::Get,
        &["/_cluster/allocation/explain"],
    )
    .with_params(&["include_yes_decisions", "include_disk_info"])
    .with_body(BodyRule::OptionalSwitch(Method::Post));

    /// `DELETE /_component_template/{name}`
    pub const DELETE_COMPONENT_TEMPLATE: Endpoint = Endpoint::new(
        "cluster.delete_component_template",
        Method::Delete,
        &["/_component_template/{name}"],
    )
    .with_params(&["timeout", "master_timeout"]);

    /// `DELETE /_cluster/voting_config_exclusions`
    pub const DELETE_VOTING_CONFIG_EXCLUSIONS: Endpoint = Endpoint::new(
        "cluster.delete_voting_config_exclusions",
        Method::Delete,
        &["/_cluster/voting_config_exclusions"],
    )
    .with_params(&["wait_for_removal"]);

    /// `HEAD /_component_template/{name}`
    pub const EXISTS_COMPONENT_TEMPLATE: Endpoint = Endpoint::new(
        "cluster.exists_component_template",
        Method::Head,
        &["/_component_template/{name}"],
    )
    .with_params(&["master_timeout", "local"]);

    /// `GET /_component_template/{name}`
    pub const GET_COMPONENT_TEMPLATE: Endpoint = Endpoint::new(
        "cluster.get_component_template",
        Method::Get,
        &["/_component_template/{name}", "/_component_template"],
    )
    .with_params(&["master_timeout", "local"]);

    /// `GET /_cluster/settings`
    pub const GET_SETTINGS: Endpoint =
        Endpoint::new("cluster.get_settings", Method::Get, &["/_cluster/settings"]).with_params(&[
            "flat_settings",
            "master_timeout",
            "timeout",
            "include_defaults",
        ]);

    /// `GET /_cluster/health/{index}`
    pub const HEALTH: Endpoint = Endpoint::new("cluster.health", Method::Get, &[
        "/_cluster/health/{index}",
        "/_cluster/health",
    ])
    .with_params(&[
        "expand_wildcards",
        "level",
        "local",
        "master_timeout",
        "timeout",
        "wait_for_active_shards",
        "wait_for_nodes",
        "wait_for_events",
        "wait_for_no_relocating_shards",
        "wait_for_no_initializing_shards",
        "wait_for_status",
    ]);

    /// `GET /_cluster/pending_tasks`
    pub const PENDING_TASKS: Endpoint =
        Endpoint::new("cluster.pending_tasks", Method::Get, &["/_cluster/pending_tasks"])
            .with_params(&["local", "master_timeout"]);

    /// `POST /_cluster/voting_config_exclusions`
    pub const POST_VOTING_CONFIG_EXCLUSIONS: Endpoint = Endpoint::new(
        "cluster.post_voting_config_exclusions",
        Method::Post,
        &["/_cluster/voting_config_exclusions"],
    )
    .with_params(&["node_ids", "node_names", "timeout"]);

    /// `PUT /_component_template/{name}`
    pub const PUT_COMPONENT_TEMPLATE: Endpoint = Endpoint::new(
        "cluster.put_component_template",
        Method::Put,
        &["/_component_template/{name}"],
    )
    .with_params(&["create", "timeout", "master_timeout"])
    .with_body(BodyRule::Required);

    /// `PUT /_cluster/settings`
    pub const PUT_SETTINGS: Endpoint =
        Endpoint::new("cluster.put_settings", Method::Put, &["/_cluster/settings"])
            .with_params(&["flat_settings", "master_timeout", "timeout"])
            .with_body(BodyRule::Required);

    /// `GET /_remote/info`
    pub const REMOTE_INFO: Endpoint =
        Endpoint::new("cluster.remote_info", Method::Get, &["/_remote/info"]);

    /// `POST /_cluster/reroute`
    pub const REROUTE: Endpoint =
        Endpoint::new("cluster.reroute", Method::Post, &["/_cluster/reroute"])
            .with_params(&[
                "dry_run",
                "explain",
                "retry_failed",
                "metric",
                "master_timeout",
                "timeout",
            ])
            .with_body(BodyRule::Optional);

    /// `GET /_cluster/state/{metric}/{index}`
    pub const STATE: Endpoint = Endpoint::new("cluster.state", Method::Get, &[
        "/_cluster/state/{metric}/{index}",
        "/_cluster/state/{metric}",
        "/_cluster/state",
    ])
    .with_params(&[
        "local",
        "master_timeout",
        "flat_settings",
        "wait_for_metadata_version",
        "wait_for_timeout",
        "ignore_unavailable",
        "allow_no_indices",
        "expand_wildcards",
    ]);

    /// `GET /_cluster/stats/nodes/{node_id}`
    pub const STATS: Endpoint = Endpoint::new("cluster.stats", Method::Get, &[
        "/_cluster/stats/nodes/{node_id}",
        "/_cluster/stats",
    ])
    .with_params(&["flat_settings", "timeout"]);
}

/// `ml.*` APIs.
pub mod ml {
    use super::{Endpoint, Method};

    /// `GET /_ml/anomaly_detectors/{job_id}/_stats`
    pub const GET_JOB_STATS: Endpoint = Endpoint::new("ml.get_job_stats", Method::Get, &[
        "/_ml/anomaly_detectors/{job_id}/_stats",
        "/_ml/anomaly_detectors/_stats",
    ])
    .with_params(&["allow_no_jobs"]);
}

/// Every known endpoint.
pub const ALL: &[Endpoint] = &[
    INFO,
    COUNT,
    GET,
    EXISTS,
    GET_SOURCE,
    SEARCH_SHARDS,
    RANK_EVAL,
    DELETE_SCRIPT,
    indices::OPEN,
    indices::DELETE_TEMPLATE,
    cluster::ALLOCATION_EXPLAIN,
    cluster::DELETE_COMPONENT_TEMPLATE,
    cluster::DELETE_VOTING_CONFIG_EXCLUSIONS,
    cluster::EXISTS_COMPONENT_TEMPLATE,
    cluster::GET_COMPONENT_TEMPLATE,
    cluster::GET_SETTINGS,
    cluster::HEALTH,
    cluster::PENDING_TASKS,
    cluster::POST_VOTING_CONFIG_EXCLUSIONS,
    cluster::PUT_COMPONENT_TEMPLATE,
    cluster::PUT_SETTINGS,
    cluster::REMOTE_INFO,
    cluster::REROUTE,
    cluster::STATE,
    cluster::STATS,
    ml::GET_JOB_STATS,
];

/// Look an endpoint up by API name, e.g. `cluster.health`.
#[must_use]
pub fn find(name: &str) -> Option<&'static Endpoint> {
    ALL.iter().find(|endpoint| endpoint.name == name)
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use serde_json::json;
    use url::Url;

    use super::*;
    use crate::{Error, Params};

    fn base() -> Url {
        Url::parse("http://localhost:9200").expect("valid URL")
    }

    #[test]
    fn find_by_name() {
        check!(find("cluster.health") == Some(&cluster::HEALTH));
        check!(find("ml.get_job_stats").map(|e| e.method) == Some(Method::Get));
        check!(find("cluster.unknown").is_none());
    }

    #[test]
    fn names_are_unique() {
        for endpoint in ALL {
            check!(ALL.iter().filter(|e| e.name == endpoint.name).count() == 1);
        }
    }

    #[test]
    fn count_with_body_is_post() {
        let request = COUNT
            .request(
                &base(),
                Params::new()
                    .path("index", "my_index")
                    .body(json!({"query": {"term": {"user": "kimchy"}}})),
            )
            .expect("request");
        check!(request.method() == Method::Post);
        check!(request.url().path() == "/my_index/_count");
    }

    #[test]
    fn cluster_health_for_index() {
        let request = cluster::HEALTH
            .request(
                &base(),
                Params::new()
                    .path("index", "logs,metrics")
                    .query("wait_for_status", "yellow"),
            )
            .expect("request");
        check!(request.url().as_str() == "http://localhost:9200/_cluster/health/logs,metrics?wait_for_status=yellow");
    }

    #[test]
    fn cluster_state_templates() {
        let request = cluster::STATE
            .request(&base(), Params::new().path("metric", "metadata"))
            .expect("request");
        check!(request.url().path() == "/_cluster/state/metadata");

        let request = cluster::STATE
            .request(
                &base(),
                Params::new().path("metric", "metadata").path("index", "logs"),
            )
            .expect("request");
        check!(request.url().path() == "/_cluster/state/metadata/logs");

        let request = cluster::STATE.request(&base(), Params::new()).expect("request");
        check!(request.url().path() == "/_cluster/state");
    }

    #[test]
    fn put_settings_requires_body() {
        let result = cluster::PUT_SETTINGS.request(&base(), Params::new());
        let_assert!(Err(Error::MissingParameter { endpoint, names }) = result);
        check!(endpoint == "cluster.put_settings");
        check!(names == ["body"]);
    }

    #[test]
    fn put_component_template_requires_name() {
        let result = cluster::PUT_COMPONENT_TEMPLATE
            .request(&base(), Params::new().body(json!({"template": {}})));
        let_assert!(Err(Error::MissingParameter { names, .. }) = result);
        check!(names == ["name"]);
    }

    #[test]
    fn exists_uses_head() {
        let request = EXISTS
            .request(&base(), Params::new().path("index", "logs").path("id", "1"))
            .expect("request");
        check!(request.method() == Method::Head);
        check!(request.url().path() == "/logs/_doc/1");
    }

    #[test]
    fn get_job_stats_without_id() {
        let request = ml::GET_JOB_STATS
            .request(&base(), Params::new().query("allow_no_jobs", true))
            .expect("request");
        check!(request.url().as_str() == "http://localhost:9200/_ml/anomaly_detectors/_stats?allow_no_jobs=true");
    }

    #[test]
    fn delete_script_rejects_unknown_param() {
        let result = DELETE_SCRIPT.request(
            &base(),
            Params::new().path("id", "my-script").query("refresh", true),
        );
        let_assert!(Err(Error::UnexpectedParameter { name, .. }) = result);
        check!(name == "refresh");
    }
}
