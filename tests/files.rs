// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

pub const FILES: [&str; 3] = [
    "./tests/vcd-files/ghdl/fsm.vcd",
    "./tests/vcd-files/icarus/counter.vcd",
    "./tests/vcd-files/verilator/alu.vcd",
];
