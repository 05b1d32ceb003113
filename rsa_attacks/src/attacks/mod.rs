pub mod fermat;
pub mod wiener;

pub use fermat::{FermatAttack, FermatAttackResult};
pub use wiener::{
    Convergent, WienerAttack, WienerAttackFailure, WienerAttackResult, continued_fraction,
    convergents,
};
