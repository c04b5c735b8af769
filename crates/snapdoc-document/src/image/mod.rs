// SPDX-License-Identifier: MIT

pub mod renderer;
