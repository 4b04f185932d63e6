pub mod model;
pub mod propagate;
pub mod search;
pub mod stats;
pub mod sum;
pub mod variable;
