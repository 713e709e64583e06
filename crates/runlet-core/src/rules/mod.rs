pub mod naming;
pub mod validation;

pub use naming::{collision_free_name, invocation_stem};
pub use validation::{
    absolute_script_path, parse_max_args, parse_min_args, parse_new_args, parse_update_args,
    validate_name, RESERVED_NAMES,
};
