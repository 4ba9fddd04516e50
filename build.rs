use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=GRAPHQL_HYPER_DENY_WARNINGS");
    if env::var_os("GRAPHQL_HYPER_DENY_WARNINGS").is_some() {
        println!("cargo:rustc-cfg=graphql_hyper_deny_warnings");
    }
}
