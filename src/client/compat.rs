use crate::error::Error;

/// Legacy request-shape fallback, keyed by method and server error code.
struct LegacyFallback {
    method: &'static str,
    code: i64,
}

/// Servers from Zabbix 2.4 on reject the wrapped `[{"hostid": "..."}]`
/// delete shape with `-32500`; the delete wrappers then re-issue the call
/// once with the plain id array.
const PLAIN_ID_DELETE_FALLBACKS: &[LegacyFallback] = &[
    LegacyFallback {
        method: "host.delete",
        code: -32500,
    },
    LegacyFallback {
        method: "hostgroup.delete",
        code: -32500,
    },
];

pub(crate) fn wants_plain_id_fallback(method: &str, err: &Error) -> bool {
    err.api_code().is_some_and(|code| {
        PLAIN_ID_DELETE_FALLBACKS
            .iter()
            .any(|fallback| fallback.method == method && fallback.code == code)
    })
}
