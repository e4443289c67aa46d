// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod dynamic_fetch;
pub mod router;
pub mod static_fetch;
pub mod traits;
