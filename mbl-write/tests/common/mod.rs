#![allow(dead_code, unused_imports)]

pub(crate) use mbl_util::{init_log, run_test};
