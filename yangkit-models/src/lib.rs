//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

// Model bindings are generated from the YANG modules and checked in. Do
// not edit by hand.

pub mod openconfig_bgp;
