// SPDX-License-Identifier: MIT

pub mod assembler;
pub mod secure;
