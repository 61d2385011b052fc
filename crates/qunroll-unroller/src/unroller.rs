//! The unrolling interpreter.
//!
//! One pass walks the top-level statements in order, keeps the register
//! and gate tables, and expands every call of a non-basis gate through its
//! declaration until only basis gates, `U` and `CX` remain. Each elementary
//! operation is handed to the backend as soon as it is produced.

use qunroll_qasm2::ast::{
    Argument, CustomUnitary, Expression, GateOp, Identifier, Location, Program, Qop, RegisterDecl,
    RegisterKind, Statement, Uop,
};
use serde::Serialize;
use tracing::{debug, info, instrument, trace};

use crate::backend::{Condition, UnrollerBackend};
use crate::broadcast::broadcast;
use crate::config::{BUILTIN_CX, BUILTIN_U, Basis, BasisGate, UnrollerConfig};
use crate::deps::check_gate_dependencies;
use crate::error::{UnrollError, UnrollResult};
use crate::regbit::RegBit;
use crate::scope::Frame;
use crate::stdlib::load_includes;
use crate::symbols::{GateData, GateOrigin, GateTable, RegisterTable};

/// Counters for one unrolling pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UnrollStats {
    /// Top-level statements processed.
    pub statements: usize,
    /// Declarations, gate definitions and elementary operations sent to the
    /// backend. The version hook is not counted.
    pub backend_calls: usize,
    /// Gate bodies expanded.
    pub gates_expanded: usize,
}

/// OpenQASM 2.0 interpreter that unrolls gate macros into a backend.
///
/// ```
/// use qunroll_qasm2::parse;
/// use qunroll_unroller::backends::Recorder;
/// use qunroll_unroller::{Unroller, UnrollerConfig};
///
/// let program = parse("OPENQASM 2.0;\ninclude \"qelib1.inc\";\nqreg q[2];\nh q;").unwrap();
/// let mut recorder = Recorder::new();
/// let stats = Unroller::new(UnrollerConfig::default())
///     .execute(&program, &mut recorder)
///     .unwrap();
///
/// // qreg q[2], then h q[0] and h q[1]
/// assert_eq!(stats.backend_calls, 3);
/// assert_eq!(recorder.calls.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Unroller {
    config: UnrollerConfig,
}

impl Unroller {
    pub fn new(config: UnrollerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &UnrollerConfig {
        &self.config
    }

    /// Interpret `program`, driving `backend` in program order.
    ///
    /// Gate declarations are checked for undefined callees and recursion
    /// before the first backend call. Any later error aborts the pass at
    /// the offending statement; calls already issued are not rolled back.
    #[instrument(skip_all, fields(version = %program.version))]
    pub fn execute<B: UnrollerBackend + ?Sized>(
        &self,
        program: &Program,
        backend: &mut B,
    ) -> UnrollResult<UnrollStats> {
        info!(
            "Unrolling {} statements against {} basis gates",
            program.statements.len(),
            self.config.basis.len()
        );

        let library = load_includes(&program.includes)?;
        let declarations = library
            .iter()
            .map(|s| (s, GateOrigin::Library))
            .chain(program.statements.iter().map(|s| (s, GateOrigin::Program)));
        let graph = check_gate_dependencies(declarations, &self.config.basis)?;
        debug!(
            "Gate dependencies checked: {} gates, {} dependencies",
            graph.gate_count(),
            graph.dependency_count()
        );

        let mut pass = Pass {
            basis: &self.config.basis,
            backend,
            registers: RegisterTable::new(),
            gates: GateTable::new(),
            stats: UnrollStats::default(),
        };
        for statement in &library {
            pass.load_library_gate(statement)?;
        }

        pass.backend.version(&program.version)?;
        for statement in &program.statements {
            pass.statement(statement)?;
            pass.stats.statements += 1;
        }

        info!(
            "Unrolled into {} backend calls ({} gate expansions, {} qubits, {} clbits)",
            pass.stats.backend_calls,
            pass.stats.gates_expanded,
            pass.registers.num_qubits(),
            pass.registers.num_clbits()
        );
        Ok(pass.stats)
    }
}

/// Unroll `program` with the default `qelib1.inc` basis.
pub fn unroll<B: UnrollerBackend + ?Sized>(
    program: &Program,
    backend: &mut B,
) -> UnrollResult<UnrollStats> {
    Unroller::default().execute(program, backend)
}

/// State of one pass.
struct Pass<'a, 'b, B: ?Sized> {
    basis: &'a Basis,
    backend: &'b mut B,
    registers: RegisterTable,
    gates: GateTable<'a>,
    stats: UnrollStats,
}

impl<'a, B: UnrollerBackend + ?Sized> Pass<'a, '_, B> {
    fn load_library_gate(&mut self, statement: &'a Statement) -> UnrollResult<()> {
        match statement {
            Statement::GateDecl(decl) => self
                .gates
                .define(GateData::from_decl(decl, GateOrigin::Library)),
            Statement::Opaque(decl) => self
                .gates
                .define(GateData::from_opaque(decl, GateOrigin::Library)),
            _ => Ok(()),
        }
    }

    fn statement(&mut self, statement: &'a Statement) -> UnrollResult<()> {
        match statement {
            Statement::Decl(decl) => self.declare_register(decl),
            Statement::GateDecl(decl) => {
                self.define_gate(GateData::from_decl(decl, GateOrigin::Program))
            }
            Statement::Opaque(decl) => {
                self.define_gate(GateData::from_opaque(decl, GateOrigin::Program))
            }
            Statement::Qop(qop) => self.qop(qop, None),
            Statement::If(stmt) => {
                let register = &stmt.register;
                self.registers
                    .require(&register.name, &register.loc, RegisterKind::Classical)?;
                let condition = Condition::new(register.name.clone(), stmt.value);
                self.qop(&stmt.op, Some(&condition))
            }
            Statement::Barrier(args) => {
                let frame = Frame::global();
                let mut qubits = Vec::new();
                for arg in args {
                    qubits.extend(self.process_bit_id(arg, &frame, RegisterKind::Quantum)?);
                }
                self.emit_barrier(&qubits)
            }
        }
    }

    fn declare_register(&mut self, decl: &RegisterDecl) -> UnrollResult<()> {
        self.registers.declare(decl)?;
        debug!(
            "Declared {} {}[{}]",
            decl.kind.keyword(),
            decl.name.name,
            decl.size
        );
        self.stats.backend_calls += 1;
        match decl.kind {
            RegisterKind::Quantum => self.backend.declare_qreg(&decl.name.name, decl.size),
            RegisterKind::Classical => self.backend.declare_creg(&decl.name.name, decl.size),
        }
    }

    fn define_gate(&mut self, gate: GateData<'a>) -> UnrollResult<()> {
        self.gates.define(gate)?;
        debug!(
            "Defined {}gate '{}' ({} params, {} qubits)",
            if gate.is_opaque() { "opaque " } else { "" },
            gate.name.name,
            gate.params.len(),
            gate.bits.len()
        );
        self.stats.backend_calls += 1;
        self.backend.define_gate(&gate)
    }

    fn qop(&mut self, qop: &'a Qop, condition: Option<&Condition>) -> UnrollResult<()> {
        let frame = Frame::global();
        match qop {
            Qop::Unitary(uop) => self.uop(uop, &frame, condition),
            Qop::Measure { qubit, clbit } => {
                let operands = [
                    self.process_bit_id(qubit, &frame, RegisterKind::Quantum)?,
                    self.process_bit_id(clbit, &frame, RegisterKind::Classical)?,
                ];
                for row in broadcast("measure", &operands, qubit.loc())? {
                    self.emit_measure(&row[0], &row[1], condition)?;
                }
                Ok(())
            }
            Qop::Reset { target } => {
                for qubit in self.process_bit_id(target, &frame, RegisterKind::Quantum)? {
                    self.emit_reset(&qubit, condition)?;
                }
                Ok(())
            }
        }
    }

    fn uop(
        &mut self,
        uop: &'a Uop,
        frame: &Frame,
        condition: Option<&Condition>,
    ) -> UnrollResult<()> {
        match uop {
            Uop::U { params, target } => {
                let (name, signature) = BUILTIN_U;
                check_arity(name, signature, params.len(), 1, target.loc())?;
                let values = evaluate(params, frame)?;
                let operands = [self.process_bit_id(target, frame, RegisterKind::Quantum)?];
                self.apply_native(name, &values, &operands, target.loc(), condition)
            }
            Uop::Cx { control, target } => {
                let operands = [
                    self.process_bit_id(control, frame, RegisterKind::Quantum)?,
                    self.process_bit_id(target, frame, RegisterKind::Quantum)?,
                ];
                self.apply_native(BUILTIN_CX.0, &[], &operands, control.loc(), condition)
            }
            Uop::Custom(call) => self.custom(call, frame, condition),
        }
    }

    /// A call of a basis gate or a declared gate.
    fn custom(
        &mut self,
        call: &'a CustomUnitary,
        frame: &Frame,
        condition: Option<&Condition>,
    ) -> UnrollResult<()> {
        let name = call.name.name.as_str();
        let loc = &call.name.loc;

        // A gate the program itself declares shadows the basis entry.
        let declared = self.gates.get(name);
        let program_gate = matches!(declared, Some(gate) if gate.origin == GateOrigin::Program);
        if !program_gate {
            if let Some(signature) = self.basis.get(name) {
                check_arity(name, signature, call.params.len(), call.args.len(), loc)?;
                let values = evaluate(&call.params, frame)?;
                let operands = self.resolve_operands(&call.args, frame)?;
                return self.apply_native(name, &values, &operands, loc, condition);
            }
        }

        let Some(gate) = declared else {
            return Err(UnrollError::UndefinedGate {
                name: name.to_string(),
                loc: loc.clone(),
            });
        };
        let signature = BasisGate::new(gate.params.len(), gate.bits.len());
        check_arity(name, signature, call.params.len(), call.args.len(), loc)?;
        let values = evaluate(&call.params, frame)?;
        let operands = self.resolve_operands(&call.args, frame)?;
        let rows = broadcast(name, &operands, loc)?;

        let Some(body) = gate.body else {
            for row in rows {
                self.stats.backend_calls += 1;
                trace!("opaque {}({:?}) {:?}", name, values, row);
                self.backend.opaque_gate(name, &values, &row, condition)?;
            }
            return Ok(());
        };

        for row in rows {
            trace!("Expanding {}({:?}) {:?}", name, values, row);
            let inner = Frame::bind(&gate, &values, &row);
            self.stats.gates_expanded += 1;
            for op in &body.ops {
                self.gate_op(op, &inner, condition)?;
            }
        }
        Ok(())
    }

    fn gate_op(
        &mut self,
        op: &'a GateOp,
        frame: &Frame,
        condition: Option<&Condition>,
    ) -> UnrollResult<()> {
        match op {
            GateOp::Uop(uop) => self.uop(uop, frame, condition),
            GateOp::Barrier(ids) => {
                let mut qubits = Vec::new();
                for id in ids.iter() {
                    qubits.extend(self.process_id(id, frame, RegisterKind::Quantum)?);
                }
                self.emit_barrier(&qubits)
            }
        }
    }

    fn resolve_operands(
        &self,
        args: &[Argument],
        frame: &Frame,
    ) -> UnrollResult<Vec<Vec<RegBit>>> {
        args.iter()
            .map(|arg| self.process_bit_id(arg, frame, RegisterKind::Quantum))
            .collect()
    }

    /// Bits an operand names.
    ///
    /// An indexed operand is one bit of a global register. A bare name is
    /// the bit bound in `frame`, or else every bit of a global register.
    fn process_bit_id(
        &self,
        arg: &Argument,
        frame: &Frame,
        kind: RegisterKind,
    ) -> UnrollResult<Vec<RegBit>> {
        match arg {
            Argument::Id(id) => self.process_id(id, frame, kind),
            Argument::Indexed(id) => {
                let size = self.registers.require(&id.name, &id.loc, kind)?;
                if id.index >= size {
                    return Err(UnrollError::IndexOutOfBounds {
                        name: id.name.clone(),
                        index: id.index,
                        size,
                        loc: id.loc.clone(),
                    });
                }
                Ok(vec![RegBit::new(&id.name, id.index)])
            }
        }
    }

    fn process_id(
        &self,
        id: &Identifier,
        frame: &Frame,
        kind: RegisterKind,
    ) -> UnrollResult<Vec<RegBit>> {
        if let Some(bit) = frame.bit(&id.name) {
            return Ok(vec![bit.clone()]);
        }
        let size = self.registers.require(&id.name, &id.loc, kind)?;
        Ok(RegBit::range(&id.name, size))
    }

    fn apply_native(
        &mut self,
        name: &str,
        params: &[f64],
        operands: &[Vec<RegBit>],
        loc: &Location,
        condition: Option<&Condition>,
    ) -> UnrollResult<()> {
        for row in broadcast(name, operands, loc)? {
            self.stats.backend_calls += 1;
            trace!("{}({:?}) {:?}", name, params, row);
            match condition {
                Some(condition) => {
                    self.backend
                        .apply_conditioned_unitary(name, params, &row, condition)?
                }
                None => self.backend.apply_unitary(name, params, &row)?,
            }
        }
        Ok(())
    }

    fn emit_measure(
        &mut self,
        qubit: &RegBit,
        clbit: &RegBit,
        condition: Option<&Condition>,
    ) -> UnrollResult<()> {
        self.stats.backend_calls += 1;
        trace!("measure {} -> {}", qubit, clbit);
        match condition {
            Some(condition) => self.backend.measure_conditioned(qubit, clbit, condition),
            None => self.backend.measure(qubit, clbit),
        }
    }

    fn emit_reset(&mut self, qubit: &RegBit, condition: Option<&Condition>) -> UnrollResult<()> {
        self.stats.backend_calls += 1;
        trace!("reset {}", qubit);
        match condition {
            Some(condition) => self.backend.reset_conditioned(qubit, condition),
            None => self.backend.reset(qubit),
        }
    }

    fn emit_barrier(&mut self, qubits: &[RegBit]) -> UnrollResult<()> {
        self.stats.backend_calls += 1;
        trace!("barrier {:?}", qubits);
        self.backend.barrier(qubits)
    }
}

fn check_arity(
    gate: &str,
    signature: BasisGate,
    got_params: usize,
    got_bits: usize,
    loc: &Location,
) -> UnrollResult<()> {
    if signature.params == got_params && signature.qubits == got_bits {
        return Ok(());
    }
    Err(UnrollError::ArityMismatch {
        gate: gate.to_string(),
        expected_params: signature.params,
        expected_bits: signature.qubits,
        got_params,
        got_bits,
        loc: loc.clone(),
    })
}

/// Evaluate actual parameters in `frame`.
fn evaluate(params: &[Expression], frame: &Frame) -> UnrollResult<Vec<f64>> {
    params
        .iter()
        .map(|expr| expr.evaluate(&|id: &Identifier| process_local_id(id, frame)))
        .collect()
}

/// Value of a parameter name in `frame`.
fn process_local_id(id: &Identifier, frame: &Frame) -> UnrollResult<f64> {
    frame
        .param(&id.name)
        .ok_or_else(|| UnrollError::UndefinedParameter {
            name: id.name.clone(),
            loc: id.loc.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{BackendCall, Recorder};
    use qunroll_qasm2::parse;

    fn run(source: &str) -> UnrollResult<(UnrollStats, Recorder)> {
        let program = parse(source).unwrap();
        let mut recorder = Recorder::new();
        let stats = unroll(&program, &mut recorder)?;
        Ok((stats, recorder))
    }

    fn unitary(name: &str, params: &[f64], qubits: &[(&str, usize)]) -> BackendCall {
        BackendCall::Unitary {
            name: name.to_string(),
            params: params.to_vec(),
            qubits: qubits.iter().map(|&(n, i)| RegBit::new(n, i)).collect(),
            condition: None,
        }
    }

    #[test]
    fn test_basis_call_is_not_expanded() {
        let (stats, recorder) =
            run("OPENQASM 2.0;\ninclude \"qelib1.inc\";\nqreg q[2];\nh q[1];").unwrap();
        assert_eq!(recorder.calls[1], unitary("h", &[], &[("q", 1)]));
        assert_eq!(stats.gates_expanded, 0);
        assert_eq!(stats.statements, 2);
    }

    #[test]
    fn test_declared_gate_is_expanded() {
        let source = "OPENQASM 2.0;\n\
                      qreg q[2];\n\
                      gate flip(t) a,b { U(t,0,pi) a; CX a,b; }\n\
                      flip(0.5) q[1],q[0];";
        let (stats, recorder) = run(source).unwrap();
        let tail = &recorder.calls[recorder.calls.len() - 2..];
        assert_eq!(
            tail,
            &[
                unitary("U", &[0.5, 0.0, std::f64::consts::PI], &[("q", 1)]),
                unitary("CX", &[], &[("q", 1), ("q", 0)]),
            ]
        );
        assert_eq!(stats.gates_expanded, 1);
    }

    #[test]
    fn test_register_call_expands_once_per_bit() {
        let source = "OPENQASM 2.0;\n\
                      qreg q[3];\n\
                      gate g a { U(0,0,0) a; }\n\
                      g q;";
        let (stats, _) = run(source).unwrap();
        assert_eq!(stats.gates_expanded, 3);
        // qreg, gate definition, three U calls
        assert_eq!(stats.backend_calls, 5);
    }

    #[test]
    fn test_parameter_outside_gate_is_undefined() {
        let err = run("OPENQASM 2.0;\nqreg q[1];\nU(theta,0,0) q[0];").unwrap_err();
        assert!(matches!(
            err,
            UnrollError::UndefinedParameter { ref name, ref loc } if name == "theta" && loc.line == 3
        ));
    }

    #[test]
    fn test_index_out_of_bounds() {
        let err = run("OPENQASM 2.0;\nqreg q[2];\nCX q[0],q[2];").unwrap_err();
        assert!(matches!(
            err,
            UnrollError::IndexOutOfBounds { index: 2, size: 2, .. }
        ));
    }

    #[test]
    fn test_measure_target_must_be_classical() {
        let err = run("OPENQASM 2.0;\nqreg q[1];\nqreg r[1];\nmeasure q[0] -> r[0];").unwrap_err();
        assert!(matches!(
            err,
            UnrollError::WrongRegisterKind { ref name, expected: RegisterKind::Classical, .. }
                if name == "r"
        ));
    }

    #[test]
    fn test_builtin_u_arity() {
        let err = run("OPENQASM 2.0;\nqreg q[1];\nU(0,0) q[0];").unwrap_err();
        assert!(matches!(
            err,
            UnrollError::ArityMismatch { expected_params: 3, got_params: 2, .. }
        ));
    }

    #[test]
    fn test_top_level_call_before_declaration() {
        let source = "OPENQASM 2.0;\nqreg q[1];\ng q[0];\ngate g a { U(0,0,0) a; }";
        let err = run(source).unwrap_err();
        assert!(matches!(err, UnrollError::UndefinedGate { ref name, .. } if name == "g"));
    }

    #[test]
    fn test_stats_count_statements() {
        let (stats, _) = run("OPENQASM 2.0;\nqreg q[1];\ncreg c[1];\nmeasure q -> c;").unwrap();
        assert_eq!(
            stats,
            UnrollStats {
                statements: 3,
                backend_calls: 3,
                gates_expanded: 0,
            }
        );
    }
}
