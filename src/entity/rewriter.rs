use crate::code::{Handle, InsnEvent, InsnSink, Label, LdcConstant, Opcode};

use super::{DeferredInit, FieldSuppression};

/// Sits in front of the sink for one constructor body and strips the default
/// initialization of suppressed collection fields.
///
/// Call [`ConstructorRewriter::finish`] at the end of the body; events still
/// deferred at that point are written out then.
pub struct ConstructorRewriter<'o, O: ?Sized, S> {
    deferred: DeferredInit<'o, O>,
    next: S,
}

impl<'o, O: FieldSuppression + ?Sized, S: InsnSink> ConstructorRewriter<'o, O, S> {
    pub fn new(oracle: &'o O, next: S) -> Self {
        ConstructorRewriter {
            deferred: DeferredInit::new(oracle),
            next,
        }
    }

    /// Flush and return the number of stripped initializations along with
    /// the downstream sink.
    #[must_use]
    pub fn finish(mut self) -> (usize, S) {
        self.deferred.flush(&mut self.next);
        (self.deferred.consumed(), self.next)
    }
}

impl<O: FieldSuppression + ?Sized, S: InsnSink> InsnSink for ConstructorRewriter<'_, O, S> {
    fn visit_var_insn(&mut self, opcode: Opcode, var: u16) {
        if !self.deferred.offer_var(opcode, var, &mut self.next) {
            self.next.visit_var_insn(opcode, var);
        }
    }

    fn visit_type_insn(&mut self, opcode: Opcode, type_name: &str) {
        if !self.deferred.offer_type(opcode, type_name, &mut self.next) {
            self.next.visit_type_insn(opcode, type_name);
        }
    }

    fn visit_insn(&mut self, opcode: Opcode) {
        if !self.deferred.offer_insn(opcode, &mut self.next) {
            self.next.visit_insn(opcode);
        }
    }

    fn visit_int_insn(&mut self, opcode: Opcode, operand: i32) {
        self.deferred.flush(&mut self.next);
        self.next.visit_int_insn(opcode, operand);
    }

    fn visit_jump_insn(&mut self, opcode: Opcode, label: Label) {
        self.deferred.flush(&mut self.next);
        self.next.visit_jump_insn(opcode, label);
    }

    fn visit_method_insn(
        &mut self,
        opcode: Opcode,
        owner: &str,
        name: &str,
        descriptor: &str,
        is_interface: bool,
    ) {
        if !self
            .deferred
            .offer_method(opcode, owner, name, descriptor, is_interface, &mut self.next)
        {
            self.next
                .visit_method_insn(opcode, owner, name, descriptor, is_interface);
        }
    }

    fn visit_field_insn(&mut self, opcode: Opcode, owner: &str, name: &str, descriptor: &str) {
        if !self
            .deferred
            .offer_field(opcode, owner, name, descriptor, &mut self.next)
        {
            self.next.visit_field_insn(opcode, owner, name, descriptor);
        }
    }

    fn visit_ldc_insn(&mut self, value: &LdcConstant) {
        self.deferred.flush(&mut self.next);
        self.next.visit_ldc_insn(value);
    }

    fn visit_iinc_insn(&mut self, var: u16, increment: i16) {
        self.deferred.flush(&mut self.next);
        self.next.visit_iinc_insn(var, increment);
    }

    fn visit_invoke_dynamic_insn(
        &mut self,
        name: &str,
        descriptor: &str,
        bootstrap: &Handle,
        bootstrap_args: &[LdcConstant],
    ) {
        self.deferred.flush(&mut self.next);
        self.next
            .visit_invoke_dynamic_insn(name, descriptor, bootstrap, bootstrap_args);
    }

    fn visit_table_switch_insn(&mut self, min: i32, max: i32, default: Label, labels: &[Label]) {
        self.deferred.flush(&mut self.next);
        self.next.visit_table_switch_insn(min, max, default, labels);
    }

    fn visit_lookup_switch_insn(&mut self, default: Label, keys: &[i32], labels: &[Label]) {
        self.deferred.flush(&mut self.next);
        self.next.visit_lookup_switch_insn(default, keys, labels);
    }

    fn visit_multi_anew_array_insn(&mut self, descriptor: &str, dimensions: u8) {
        self.deferred.flush(&mut self.next);
        self.next.visit_multi_anew_array_insn(descriptor, dimensions);
    }

    fn visit_label(&mut self, label: Label) {
        if !self.deferred.offer_label(label, &mut self.next) {
            self.next.visit_label(label);
        }
    }

    fn visit_line_number(&mut self, line: u16, start: Label) {
        if !self.deferred.offer_line_number(line, start, &mut self.next) {
            self.next.visit_line_number(line, start);
        }
    }

    fn visit_event(&mut self, event: &InsnEvent) {
        if !self.deferred.offer(event, &mut self.next) {
            self.next.visit_event(event);
        }
    }
}
