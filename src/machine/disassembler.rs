//! Program disassembler for debug output.

use super::instruction::Instruction;
use super::program::Program;

/// Disassemble a program to a human-readable string.
///
/// One line per top-level instruction: codel offset, size, instruction.
/// Composites are followed by their primitive ops when `expand` is set.
pub fn disassemble(program: &Program, expand: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "== program ({} instructions, {} codels) ==\n",
        program.body().len() + 1,
        program.size()
    ));

    let mut offset = 0;
    for instruction in program.instructions() {
        let size = instruction.size();
        out.push_str(&format!("{:04} {:>4}  {}\n", offset, size, instruction));
        if expand && !matches!(instruction, Instruction::Op(_)) {
            let ops: Vec<_> = instruction.expand().iter().map(|op| op.name()).collect();
            out.push_str(&format!("          | {}\n", ops.join(" ")));
        }
        offset += size;
    }
    out
}
