//! Cross-crate flows: credentials → secure channel → gateway → peer → world state.

#[cfg(test)]
mod admission;
#[cfg(test)]
mod flows;
#[cfg(test)]
mod harness;
