use std::fmt;

/// A JVM opcode as seen by an instruction visitor.
///
/// Short forms are normalized by the decoder: `aload_0` arrives as `ALOAD`
/// with var 0 and `ldc_w` as `LDC`.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Opcode(pub u8);

macro_rules! opcodes {
    ($($name:ident = $value:literal,)+) => {
        impl Opcode {
            $(pub const $name: Opcode = Opcode($value);)+

            /// Mnemonic in upper case, or `None` for bytes the JVM does not
            /// assign.
            pub fn mnemonic(self) -> Option<&'static str> {
                match self.0 {
                    $($value => Some(stringify!($name)),)+
                    _ => None,
                }
            }
        }
    };
}

opcodes! {
    NOP = 0x00,
    ACONST_NULL = 0x01,
    ICONST_M1 = 0x02,
    ICONST_0 = 0x03,
    ICONST_1 = 0x04,
    ICONST_2 = 0x05,
    ICONST_3 = 0x06,
    ICONST_4 = 0x07,
    ICONST_5 = 0x08,
    LCONST_0 = 0x09,
    LCONST_1 = 0x0a,
    FCONST_0 = 0x0b,
    FCONST_1 = 0x0c,
    FCONST_2 = 0x0d,
    DCONST_0 = 0x0e,
    DCONST_1 = 0x0f,
    BIPUSH = 0x10,
    SIPUSH = 0x11,
    LDC = 0x12,
    LDC_W = 0x13,
    LDC2_W = 0x14,
    ILOAD = 0x15,
    LLOAD = 0x16,
    FLOAD = 0x17,
    DLOAD = 0x18,
    ALOAD = 0x19,
    ILOAD_0 = 0x1a,
    ILOAD_1 = 0x1b,
    ILOAD_2 = 0x1c,
    ILOAD_3 = 0x1d,
    LLOAD_0 = 0x1e,
    LLOAD_1 = 0x1f,
    LLOAD_2 = 0x20,
    LLOAD_3 = 0x21,
    FLOAD_0 = 0x22,
    FLOAD_1 = 0x23,
    FLOAD_2 = 0x24,
    FLOAD_3 = 0x25,
    DLOAD_0 = 0x26,
    DLOAD_1 = 0x27,
    DLOAD_2 = 0x28,
    DLOAD_3 = 0x29,
    ALOAD_0 = 0x2a,
    ALOAD_1 = 0x2b,
    ALOAD_2 = 0x2c,
    ALOAD_3 = 0x2d,
    IALOAD = 0x2e,
    LALOAD = 0x2f,
    FALOAD = 0x30,
    DALOAD = 0x31,
    AALOAD = 0x32,
    BALOAD = 0x33,
    CALOAD = 0x34,
    SALOAD = 0x35,
    ISTORE = 0x36,
    LSTORE = 0x37,
    FSTORE = 0x38,
    DSTORE = 0x39,
    ASTORE = 0x3a,
    ISTORE_0 = 0x3b,
    ISTORE_1 = 0x3c,
    ISTORE_2 = 0x3d,
    ISTORE_3 = 0x3e,
    LSTORE_0 = 0x3f,
    LSTORE_1 = 0x40,
    LSTORE_2 = 0x41,
    LSTORE_3 = 0x42,
    FSTORE_0 = 0x43,
    FSTORE_1 = 0x44,
    FSTORE_2 = 0x45,
    FSTORE_3 = 0x46,
    DSTORE_0 = 0x47,
    DSTORE_1 = 0x48,
    DSTORE_2 = 0x49,
    DSTORE_3 = 0x4a,
    ASTORE_0 = 0x4b,
    ASTORE_1 = 0x4c,
    ASTORE_2 = 0x4d,
    ASTORE_3 = 0x4e,
    IASTORE = 0x4f,
    LASTORE = 0x50,
    FASTORE = 0x51,
    DASTORE = 0x52,
    AASTORE = 0x53,
    BASTORE = 0x54,
    CASTORE = 0x55,
    SASTORE = 0x56,
    POP = 0x57,
    POP2 = 0x58,
    DUP = 0x59,
    DUP_X1 = 0x5a,
    DUP_X2 = 0x5b,
    DUP2 = 0x5c,
    DUP2_X1 = 0x5d,
    DUP2_X2 = 0x5e,
    SWAP = 0x5f,
    IADD = 0x60,
    LADD = 0x61,
    FADD = 0x62,
    DADD = 0x63,
    ISUB = 0x64,
    LSUB = 0x65,
    FSUB = 0x66,
    DSUB = 0x67,
    IMUL = 0x68,
    LMUL = 0x69,
    FMUL = 0x6a,
    DMUL = 0x6b,
    IDIV = 0x6c,
    LDIV = 0x6d,
    FDIV = 0x6e,
    DDIV = 0x6f,
    IREM = 0x70,
    LREM = 0x71,
    FREM = 0x72,
    DREM = 0x73,
    INEG = 0x74,
    LNEG = 0x75,
    FNEG = 0x76,
    DNEG = 0x77,
    ISHL = 0x78,
    LSHL = 0x79,
    ISHR = 0x7a,
    LSHR = 0x7b,
    IUSHR = 0x7c,
    LUSHR = 0x7d,
    IAND = 0x7e,
    LAND = 0x7f,
    IOR = 0x80,
    LOR = 0x81,
    IXOR = 0x82,
    LXOR = 0x83,
    IINC = 0x84,
    I2L = 0x85,
    I2F = 0x86,
    I2D = 0x87,
    L2I = 0x88,
    L2F = 0x89,
    L2D = 0x8a,
    F2I = 0x8b,
    F2L = 0x8c,
    F2D = 0x8d,
    D2I = 0x8e,
    D2L = 0x8f,
    D2F = 0x90,
    I2B = 0x91,
    I2C = 0x92,
    I2S = 0x93,
    LCMP = 0x94,
    FCMPL = 0x95,
    FCMPG = 0x96,
    DCMPL = 0x97,
    DCMPG = 0x98,
    IFEQ = 0x99,
    IFNE = 0x9a,
    IFLT = 0x9b,
    IFGE = 0x9c,
    IFGT = 0x9d,
    IFLE = 0x9e,
    IF_ICMPEQ = 0x9f,
    IF_ICMPNE = 0xa0,
    IF_ICMPLT = 0xa1,
    IF_ICMPGE = 0xa2,
    IF_ICMPGT = 0xa3,
    IF_ICMPLE = 0xa4,
    IF_ACMPEQ = 0xa5,
    IF_ACMPNE = 0xa6,
    GOTO = 0xa7,
    JSR = 0xa8,
    RET = 0xa9,
    TABLESWITCH = 0xaa,
    LOOKUPSWITCH = 0xab,
    IRETURN = 0xac,
    LRETURN = 0xad,
    FRETURN = 0xae,
    DRETURN = 0xaf,
    ARETURN = 0xb0,
    RETURN = 0xb1,
    GETSTATIC = 0xb2,
    PUTSTATIC = 0xb3,
    GETFIELD = 0xb4,
    PUTFIELD = 0xb5,
    INVOKEVIRTUAL = 0xb6,
    INVOKESPECIAL = 0xb7,
    INVOKESTATIC = 0xb8,
    INVOKEINTERFACE = 0xb9,
    INVOKEDYNAMIC = 0xba,
    NEW = 0xbb,
    NEWARRAY = 0xbc,
    ANEWARRAY = 0xbd,
    ARRAYLENGTH = 0xbe,
    ATHROW = 0xbf,
    CHECKCAST = 0xc0,
    INSTANCEOF = 0xc1,
    MONITORENTER = 0xc2,
    MONITOREXIT = 0xc3,
    WIDE = 0xc4,
    MULTIANEWARRAY = 0xc5,
    IFNULL = 0xc6,
    IFNONNULL = 0xc7,
    GOTO_W = 0xc8,
    JSR_W = 0xc9,
    BREAKPOINT = 0xca,
    IMPDEP1 = 0xfe,
    IMPDEP2 = 0xff,
}

impl fmt::Debug for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mnemonic() {
            Some(name) => f.write_str(name),
            None => write!(f, "Opcode({:#04x})", self.0),
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Opaque handle for a code position. Identity is the id; the writer that
/// issued the label owns its resolution to an offset.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Label(pub u32);

/// A `CONSTANT_MethodHandle` as passed to `LDC` or as a bootstrap method.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Handle {
    /// `reference_kind`, 1 (`getField`) to 9 (`invokeInterface`).
    pub kind: u8,
    pub owner: String,
    pub name: String,
    pub descriptor: String,
    pub is_interface: bool,
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}{} ({})",
            self.owner, self.name, self.descriptor, self.kind
        )
    }
}

/// Operand of `LDC` and bootstrap method arguments.
#[derive(Clone, Debug, PartialEq)]
pub enum LdcConstant {
    Int(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    String(String),
    /// A class literal, by internal name or array descriptor.
    Type(String),
    MethodType(String),
    Handle(Handle),
    Dynamic {
        name: String,
        descriptor: String,
        bootstrap: Handle,
        bootstrap_args: Vec<LdcConstant>,
    },
}

impl fmt::Display for LdcConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LdcConstant::Int(v) => write!(f, "{v}"),
            LdcConstant::Float(v) => write!(f, "{v}F"),
            LdcConstant::Long(v) => write!(f, "{v}L"),
            LdcConstant::Double(v) => write!(f, "{v}D"),
            LdcConstant::String(v) => write!(f, "{v:?}"),
            LdcConstant::Type(v) => write!(f, "{v}.class"),
            LdcConstant::MethodType(v) => f.write_str(v),
            LdcConstant::Handle(handle) => write!(f, "{handle}"),
            LdcConstant::Dynamic {
                name, descriptor, ..
            } => write!(f, "{name} : {descriptor}"),
        }
    }
}

/// One decoded instruction or positional marker of a method body.
#[derive(Clone, Debug, PartialEq)]
pub enum InsnEvent {
    Var {
        opcode: Opcode,
        var: u16,
    },
    Type {
        opcode: Opcode,
        type_name: String,
    },
    Insn {
        opcode: Opcode,
    },
    Int {
        opcode: Opcode,
        operand: i32,
    },
    Jump {
        opcode: Opcode,
        label: Label,
    },
    Method {
        opcode: Opcode,
        owner: String,
        name: String,
        descriptor: String,
        is_interface: bool,
    },
    Field {
        opcode: Opcode,
        owner: String,
        name: String,
        descriptor: String,
    },
    Ldc(LdcConstant),
    Iinc {
        var: u16,
        increment: i16,
    },
    InvokeDynamic {
        name: String,
        descriptor: String,
        bootstrap: Handle,
        bootstrap_args: Vec<LdcConstant>,
    },
    TableSwitch {
        min: i32,
        max: i32,
        default: Label,
        labels: Vec<Label>,
    },
    LookupSwitch {
        default: Label,
        keys: Vec<i32>,
        labels: Vec<Label>,
    },
    MultiANewArray {
        descriptor: String,
        dimensions: u8,
    },
    Label(Label),
    LineNumber {
        line: u16,
        start: Label,
    },
}

impl InsnEvent {
    pub fn var(opcode: Opcode, var: u16) -> Self {
        InsnEvent::Var { opcode, var }
    }

    pub fn type_insn(opcode: Opcode, type_name: &str) -> Self {
        InsnEvent::Type {
            opcode,
            type_name: type_name.to_string(),
        }
    }

    pub fn insn(opcode: Opcode) -> Self {
        InsnEvent::Insn { opcode }
    }

    pub fn method(
        opcode: Opcode,
        owner: &str,
        name: &str,
        descriptor: &str,
        is_interface: bool,
    ) -> Self {
        InsnEvent::Method {
            opcode,
            owner: owner.to_string(),
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            is_interface,
        }
    }

    pub fn field(opcode: Opcode, owner: &str, name: &str, descriptor: &str) -> Self {
        InsnEvent::Field {
            opcode,
            owner: owner.to_string(),
            name: name.to_string(),
            descriptor: descriptor.to_string(),
        }
    }

    pub fn ldc_string(value: &str) -> Self {
        InsnEvent::Ldc(LdcConstant::String(value.to_string()))
    }

    /// Re-emit this event to `sink` with exactly the same arguments.
    pub fn replay<S: InsnSink + ?Sized>(&self, sink: &mut S) {
        match self {
            InsnEvent::Var { opcode, var } => sink.visit_var_insn(*opcode, *var),
            InsnEvent::Type { opcode, type_name } => sink.visit_type_insn(*opcode, type_name),
            InsnEvent::Insn { opcode } => sink.visit_insn(*opcode),
            InsnEvent::Int { opcode, operand } => sink.visit_int_insn(*opcode, *operand),
            InsnEvent::Jump { opcode, label } => sink.visit_jump_insn(*opcode, *label),
            InsnEvent::Method {
                opcode,
                owner,
                name,
                descriptor,
                is_interface,
            } => sink.visit_method_insn(*opcode, owner, name, descriptor, *is_interface),
            InsnEvent::Field {
                opcode,
                owner,
                name,
                descriptor,
            } => sink.visit_field_insn(*opcode, owner, name, descriptor),
            InsnEvent::Ldc(value) => sink.visit_ldc_insn(value),
            InsnEvent::Iinc { var, increment } => sink.visit_iinc_insn(*var, *increment),
            InsnEvent::InvokeDynamic {
                name,
                descriptor,
                bootstrap,
                bootstrap_args,
            } => sink.visit_invoke_dynamic_insn(name, descriptor, bootstrap, bootstrap_args),
            InsnEvent::TableSwitch {
                min,
                max,
                default,
                labels,
            } => sink.visit_table_switch_insn(*min, *max, *default, labels),
            InsnEvent::LookupSwitch {
                default,
                keys,
                labels,
            } => sink.visit_lookup_switch_insn(*default, keys, labels),
            InsnEvent::MultiANewArray {
                descriptor,
                dimensions,
            } => sink.visit_multi_anew_array_insn(descriptor, *dimensions),
            InsnEvent::Label(label) => sink.visit_label(*label),
            InsnEvent::LineNumber { line, start } => sink.visit_line_number(*line, *start),
        }
    }
}

impl fmt::Display for InsnEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsnEvent::Var { opcode, var } => write!(f, "{opcode} {var}"),
            InsnEvent::Type { opcode, type_name } => write!(f, "{opcode} {type_name}"),
            InsnEvent::Insn { opcode } => write!(f, "{opcode}"),
            InsnEvent::Int { opcode, operand } => write!(f, "{opcode} {operand}"),
            InsnEvent::Jump { opcode, label } => write!(f, "{opcode} L{}", label.0),
            InsnEvent::Method {
                opcode,
                owner,
                name,
                descriptor,
                ..
            } => write!(f, "{opcode} {owner}.{name} {descriptor}"),
            InsnEvent::Field {
                opcode,
                owner,
                name,
                descriptor,
            } => write!(f, "{opcode} {owner}.{name} : {descriptor}"),
            InsnEvent::Ldc(value) => write!(f, "LDC {value}"),
            InsnEvent::Iinc { var, increment } => write!(f, "IINC {var} {increment}"),
            InsnEvent::InvokeDynamic {
                name,
                descriptor,
                bootstrap,
                ..
            } => write!(f, "INVOKEDYNAMIC {name}{descriptor} [{bootstrap}]"),
            InsnEvent::TableSwitch { min, max, .. } => write!(f, "TABLESWITCH {min}..={max}"),
            InsnEvent::LookupSwitch { keys, .. } => write!(f, "LOOKUPSWITCH {keys:?}"),
            InsnEvent::MultiANewArray {
                descriptor,
                dimensions,
            } => write!(f, "MULTIANEWARRAY {descriptor} {dimensions}"),
            InsnEvent::Label(label) => write!(f, "L{}", label.0),
            InsnEvent::LineNumber { line, start } => write!(f, "LINENUMBER {line} L{}", start.0),
        }
    }
}

/// Receiver of a method body's instruction stream, one callback per event
/// shape.
pub trait InsnSink {
    fn visit_var_insn(&mut self, opcode: Opcode, var: u16);

    fn visit_type_insn(&mut self, opcode: Opcode, type_name: &str);

    fn visit_insn(&mut self, opcode: Opcode);

    fn visit_int_insn(&mut self, opcode: Opcode, operand: i32);

    fn visit_jump_insn(&mut self, opcode: Opcode, label: Label);

    fn visit_method_insn(
        &mut self,
        opcode: Opcode,
        owner: &str,
        name: &str,
        descriptor: &str,
        is_interface: bool,
    );

    fn visit_field_insn(&mut self, opcode: Opcode, owner: &str, name: &str, descriptor: &str);

    fn visit_ldc_insn(&mut self, value: &LdcConstant);

    fn visit_iinc_insn(&mut self, var: u16, increment: i16);

    fn visit_invoke_dynamic_insn(
        &mut self,
        name: &str,
        descriptor: &str,
        bootstrap: &Handle,
        bootstrap_args: &[LdcConstant],
    );

    /// `labels[i]` is the target for key `min + i`.
    fn visit_table_switch_insn(&mut self, min: i32, max: i32, default: Label, labels: &[Label]);

    fn visit_lookup_switch_insn(&mut self, default: Label, keys: &[i32], labels: &[Label]);

    fn visit_multi_anew_array_insn(&mut self, descriptor: &str, dimensions: u8);

    fn visit_label(&mut self, label: Label);

    fn visit_line_number(&mut self, line: u16, start: Label);

    fn visit_event(&mut self, event: &InsnEvent) {
        event.replay(self);
    }
}

impl<S: InsnSink + ?Sized> InsnSink for &mut S {
    fn visit_var_insn(&mut self, opcode: Opcode, var: u16) {
        (**self).visit_var_insn(opcode, var)
    }

    fn visit_type_insn(&mut self, opcode: Opcode, type_name: &str) {
        (**self).visit_type_insn(opcode, type_name)
    }

    fn visit_insn(&mut self, opcode: Opcode) {
        (**self).visit_insn(opcode)
    }

    fn visit_int_insn(&mut self, opcode: Opcode, operand: i32) {
        (**self).visit_int_insn(opcode, operand)
    }

    fn visit_jump_insn(&mut self, opcode: Opcode, label: Label) {
        (**self).visit_jump_insn(opcode, label)
    }

    fn visit_method_insn(
        &mut self,
        opcode: Opcode,
        owner: &str,
        name: &str,
        descriptor: &str,
        is_interface: bool,
    ) {
        (**self).visit_method_insn(opcode, owner, name, descriptor, is_interface)
    }

    fn visit_field_insn(&mut self, opcode: Opcode, owner: &str, name: &str, descriptor: &str) {
        (**self).visit_field_insn(opcode, owner, name, descriptor)
    }

    fn visit_ldc_insn(&mut self, value: &LdcConstant) {
        (**self).visit_ldc_insn(value)
    }

    fn visit_iinc_insn(&mut self, var: u16, increment: i16) {
        (**self).visit_iinc_insn(var, increment)
    }

    fn visit_invoke_dynamic_insn(
        &mut self,
        name: &str,
        descriptor: &str,
        bootstrap: &Handle,
        bootstrap_args: &[LdcConstant],
    ) {
        (**self).visit_invoke_dynamic_insn(name, descriptor, bootstrap, bootstrap_args)
    }

    fn visit_table_switch_insn(&mut self, min: i32, max: i32, default: Label, labels: &[Label]) {
        (**self).visit_table_switch_insn(min, max, default, labels)
    }

    fn visit_lookup_switch_insn(&mut self, default: Label, keys: &[i32], labels: &[Label]) {
        (**self).visit_lookup_switch_insn(default, keys, labels)
    }

    fn visit_multi_anew_array_insn(&mut self, descriptor: &str, dimensions: u8) {
        (**self).visit_multi_anew_array_insn(descriptor, dimensions)
    }

    fn visit_label(&mut self, label: Label) {
        (**self).visit_label(label)
    }

    fn visit_line_number(&mut self, line: u16, start: Label) {
        (**self).visit_line_number(line, start)
    }
}

/// Records every event, in order.
impl InsnSink for Vec<InsnEvent> {
    fn visit_var_insn(&mut self, opcode: Opcode, var: u16) {
        self.push(InsnEvent::var(opcode, var));
    }

    fn visit_type_insn(&mut self, opcode: Opcode, type_name: &str) {
        self.push(InsnEvent::type_insn(opcode, type_name));
    }

    fn visit_insn(&mut self, opcode: Opcode) {
        self.push(InsnEvent::insn(opcode));
    }

    fn visit_int_insn(&mut self, opcode: Opcode, operand: i32) {
        self.push(InsnEvent::Int { opcode, operand });
    }

    fn visit_jump_insn(&mut self, opcode: Opcode, label: Label) {
        self.push(InsnEvent::Jump { opcode, label });
    }

    fn visit_method_insn(
        &mut self,
        opcode: Opcode,
        owner: &str,
        name: &str,
        descriptor: &str,
        is_interface: bool,
    ) {
        self.push(InsnEvent::method(opcode, owner, name, descriptor, is_interface));
    }

    fn visit_field_insn(&mut self, opcode: Opcode, owner: &str, name: &str, descriptor: &str) {
        self.push(InsnEvent::field(opcode, owner, name, descriptor));
    }

    fn visit_ldc_insn(&mut self, value: &LdcConstant) {
        self.push(InsnEvent::Ldc(value.clone()));
    }

    fn visit_iinc_insn(&mut self, var: u16, increment: i16) {
        self.push(InsnEvent::Iinc { var, increment });
    }

    fn visit_invoke_dynamic_insn(
        &mut self,
        name: &str,
        descriptor: &str,
        bootstrap: &Handle,
        bootstrap_args: &[LdcConstant],
    ) {
        self.push(InsnEvent::InvokeDynamic {
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            bootstrap: bootstrap.clone(),
            bootstrap_args: bootstrap_args.to_vec(),
        });
    }

    fn visit_table_switch_insn(&mut self, min: i32, max: i32, default: Label, labels: &[Label]) {
        self.push(InsnEvent::TableSwitch {
            min,
            max,
            default,
            labels: labels.to_vec(),
        });
    }

    fn visit_lookup_switch_insn(&mut self, default: Label, keys: &[i32], labels: &[Label]) {
        self.push(InsnEvent::LookupSwitch {
            default,
            keys: keys.to_vec(),
            labels: labels.to_vec(),
        });
    }

    fn visit_multi_anew_array_insn(&mut self, descriptor: &str, dimensions: u8) {
        self.push(InsnEvent::MultiANewArray {
            descriptor: descriptor.to_string(),
            dimensions,
        });
    }

    fn visit_label(&mut self, label: Label) {
        self.push(InsnEvent::Label(label));
    }

    fn visit_line_number(&mut self, line: u16, start: Label) {
        self.push(InsnEvent::LineNumber { line, start });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_assigned_byte_has_a_mnemonic() {
        for byte in 0x00..=0xca {
            assert!(Opcode(byte).mnemonic().is_some(), "{byte:#04x}");
        }
        assert_eq!(Opcode(0x0c).to_string(), "FCONST_1");
        assert_eq!(Opcode(0xcb).to_string(), "Opcode(0xcb)");
    }
}
