//! Verification Program Module
//!
//! Recognised control-program forms and the executor seam. Program
//! interpretation itself lives behind `ProgramExecutor`; the validator only
//! hands it a program, the witness arguments and a gas budget.

mod executor;
mod script;

pub use executor::{FlatCostExecutor, ProgramContext, ProgramExecutor};
pub use script::{
    OP_FAIL, OP_TRUE, is_p2w_script, is_p2wpkh_script, is_p2wsh_script, is_unspendable,
    p2wpkh_program, p2wsh_program, pegin_contract_program, push_data,
};
