use log::{debug, trace};

use crate::code::{InsnEvent, InsnSink, Label, Opcode};

use super::FieldSuppression;

pub const INIT: &str = "<init>";
pub const NOARG_VOID: &str = "()V";

/// Collection implementations whose default construction into a persistent
/// many field is stripped. The runtime replaces those fields with lazy
/// loading collections, so the eager instance is wasted work.
pub const COLLECTION_TYPES: [&str; 3] = [
    "java/util/ArrayList",
    "java/util/HashSet",
    "java/util/LinkedHashSet",
];

/// Minimum number of deferred events in a complete idiom:
/// `ALOAD 0, NEW, DUP, INVOKESPECIAL`.
const MIN_IDIOM_LEN: usize = 4;

pub fn is_collection(type_name: &str) -> bool {
    COLLECTION_TYPES.contains(&type_name)
}

fn is_collection_init(owner: &str, name: &str, descriptor: &str) -> bool {
    name == INIT && descriptor == NOARG_VOID && is_collection(owner)
}

/// How far a collection initialization has been matched.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeferState {
    Initial,
    /// `ALOAD 0`
    SelfRef,
    /// `ICONST_0` emitted by the Kotlin compiler ahead of an `ISTORE`.
    ZeroPush,
    NewCollection,
    Dup,
    /// `INVOKESPECIAL <collection>.<init> ()V`
    CollectionInit,
    /// Kotlin: `CHECKCAST` to the declared field type.
    CheckCast,
    /// Kotlin: a label between the cast and its line number.
    CastPosition,
}

/// An offered event, reduced to what the transition table looks at.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Step {
    LoadSelf,
    StoreInt,
    ZeroPush,
    NewCollection,
    Dup,
    CollectionInit,
    CheckCast,
    Label,
    LineNumber,
    PutField { suppressed: bool },
    Other,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Action {
    /// Buffer the event and move on.
    Defer(DeferState),
    /// Flush what is buffered, then buffer the event as a new start.
    Restart(DeferState),
    /// The idiom is complete: drop the buffer and the event.
    Consume,
    /// Flush what is buffered and let the event through.
    Reject,
}

fn transition(state: DeferState, step: Step) -> Action {
    use DeferState::*;

    match (state, step) {
        (ZeroPush, Step::StoreInt) => Action::Defer(SelfRef),
        (_, Step::LoadSelf) => Action::Restart(SelfRef),
        (SelfRef, Step::ZeroPush) => Action::Defer(ZeroPush),
        (SelfRef, Step::NewCollection) => Action::Defer(NewCollection),
        (NewCollection, Step::Dup) => Action::Defer(Dup),
        (Dup, Step::CollectionInit) => Action::Defer(CollectionInit),
        (CollectionInit, Step::CheckCast) => Action::Defer(CheckCast),
        (CheckCast, Step::Label) => Action::Defer(CastPosition),
        (CastPosition, Step::LineNumber) => Action::Defer(CollectionInit),
        (CollectionInit | CheckCast, Step::PutField { suppressed: true }) => Action::Consume,
        _ => Action::Reject,
    }
}

/// Defers the instructions of a constructor so that the default
/// initialization of persistent many fields can be removed:
///
/// ```text
/// ALOAD 0
/// ICONST_0                           // optional, Kotlin
/// ISTORE 1                           // optional, Kotlin
/// NEW java/util/ArrayList
/// DUP
/// INVOKESPECIAL java/util/ArrayList.<init> ()V
/// CHECKCAST java/util/List           // optional, Kotlin
/// L4                                 // optional, Kotlin
/// LINENUMBER 12 L4                   // optional, Kotlin
/// PUTFIELD test/model/Customer.contacts : Ljava/util/List;
/// ```
///
/// Every offer returns `true` when the event was taken (buffered or
/// dropped). On `false` the caller forwards the event itself; anything that
/// was buffered has already been written to the sink by then.
pub struct DeferredInit<'o, O: ?Sized> {
    oracle: &'o O,
    codes: Vec<InsnEvent>,
    state: DeferState,
    consumed: usize,
}

impl<'o, O: FieldSuppression + ?Sized> DeferredInit<'o, O> {
    pub fn new(oracle: &'o O) -> Self {
        DeferredInit {
            oracle,
            codes: Vec::new(),
            state: DeferState::Initial,
            consumed: 0,
        }
    }

    pub fn state(&self) -> DeferState {
        self.state
    }

    /// Events currently held back.
    pub fn deferred(&self) -> &[InsnEvent] {
        &self.codes
    }

    /// Number of collection initializations removed so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn offer_var<S: InsnSink + ?Sized>(&mut self, opcode: Opcode, var: u16, sink: &mut S) -> bool {
        let step = match (opcode, var) {
            (Opcode::ALOAD, 0) => Step::LoadSelf,
            (Opcode::ISTORE, _) => Step::StoreInt,
            _ => Step::Other,
        };
        self.apply(step, sink, || InsnEvent::var(opcode, var))
    }

    pub fn offer_type<S: InsnSink + ?Sized>(
        &mut self,
        opcode: Opcode,
        type_name: &str,
        sink: &mut S,
    ) -> bool {
        let step = match opcode {
            Opcode::NEW if is_collection(type_name) => Step::NewCollection,
            Opcode::CHECKCAST => Step::CheckCast,
            _ => Step::Other,
        };
        self.apply(step, sink, || InsnEvent::type_insn(opcode, type_name))
    }

    pub fn offer_insn<S: InsnSink + ?Sized>(&mut self, opcode: Opcode, sink: &mut S) -> bool {
        let step = match opcode {
            Opcode::ICONST_0 => Step::ZeroPush,
            Opcode::DUP => Step::Dup,
            _ => Step::Other,
        };
        self.apply(step, sink, || InsnEvent::insn(opcode))
    }

    pub fn offer_method<S: InsnSink + ?Sized>(
        &mut self,
        opcode: Opcode,
        owner: &str,
        name: &str,
        descriptor: &str,
        is_interface: bool,
        sink: &mut S,
    ) -> bool {
        let step = if opcode == Opcode::INVOKESPECIAL && is_collection_init(owner, name, descriptor) {
            Step::CollectionInit
        } else {
            Step::Other
        };
        self.apply(step, sink, || {
            InsnEvent::method(opcode, owner, name, descriptor, is_interface)
        })
    }

    pub fn offer_field<S: InsnSink + ?Sized>(
        &mut self,
        opcode: Opcode,
        owner: &str,
        name: &str,
        descriptor: &str,
        sink: &mut S,
    ) -> bool {
        let step = match (opcode, self.state) {
            (Opcode::PUTFIELD, DeferState::CollectionInit | DeferState::CheckCast) => {
                Step::PutField {
                    suppressed: self.oracle.suppress_init(name),
                }
            }
            _ => Step::Other,
        };
        let consumed = self.apply(step, sink, || {
            InsnEvent::field(opcode, owner, name, descriptor)
        });
        if consumed {
            debug!("consumed init of many: {owner}.{name}");
        }
        consumed
    }

    pub fn offer_label<S: InsnSink + ?Sized>(&mut self, label: Label, sink: &mut S) -> bool {
        self.apply(Step::Label, sink, || InsnEvent::Label(label))
    }

    pub fn offer_line_number<S: InsnSink + ?Sized>(
        &mut self,
        line: u16,
        start: Label,
        sink: &mut S,
    ) -> bool {
        self.apply(Step::LineNumber, sink, || InsnEvent::LineNumber { line, start })
    }

    /// Offer any event. Events of a shape that never takes part in the idiom
    /// (`Int`, `Jump`, `Ldc`, `Iinc`, switches, `InvokeDynamic` and
    /// `MultiANewArray`) flush and are never taken.
    pub fn offer<S: InsnSink + ?Sized>(&mut self, event: &InsnEvent, sink: &mut S) -> bool {
        match event {
            InsnEvent::Var { opcode, var } => self.offer_var(*opcode, *var, sink),
            InsnEvent::Type { opcode, type_name } => self.offer_type(*opcode, type_name, sink),
            InsnEvent::Insn { opcode } => self.offer_insn(*opcode, sink),
            InsnEvent::Method {
                opcode,
                owner,
                name,
                descriptor,
                is_interface,
            } => self.offer_method(*opcode, owner, name, descriptor, *is_interface, sink),
            InsnEvent::Field {
                opcode,
                owner,
                name,
                descriptor,
            } => self.offer_field(*opcode, owner, name, descriptor, sink),
            InsnEvent::Label(label) => self.offer_label(*label, sink),
            InsnEvent::LineNumber { line, start } => self.offer_line_number(*line, *start, sink),
            InsnEvent::Int { .. }
            | InsnEvent::Jump { .. }
            | InsnEvent::Ldc(_)
            | InsnEvent::Iinc { .. }
            | InsnEvent::InvokeDynamic { .. }
            | InsnEvent::TableSwitch { .. }
            | InsnEvent::LookupSwitch { .. }
            | InsnEvent::MultiANewArray { .. } => {
                self.flush(sink);
                false
            }
        }
    }

    /// Write out everything deferred and start over. Calling it again is a
    /// no-op.
    pub fn flush<S: InsnSink + ?Sized>(&mut self, sink: &mut S) {
        self.state = DeferState::Initial;
        for code in self.codes.drain(..) {
            trace!("flush deferred: {code}");
            code.replay(sink);
        }
    }

    fn apply<S, F>(&mut self, step: Step, sink: &mut S, defer: F) -> bool
    where
        S: InsnSink + ?Sized,
        F: FnOnce() -> InsnEvent,
    {
        match transition(self.state, step) {
            Action::Defer(next) => {
                self.codes.push(defer());
                self.state = next;
                true
            }
            Action::Restart(next) => {
                self.flush(sink);
                self.codes.push(defer());
                self.state = next;
                true
            }
            Action::Consume => {
                assert!(
                    self.codes.len() >= MIN_IDIOM_LEN,
                    "collection init consumed with only {} deferred instructions in state {:?}",
                    self.codes.len(),
                    self.state
                );
                self.codes.clear();
                self.state = DeferState::Initial;
                self.consumed += 1;
                true
            }
            Action::Reject => {
                self.flush(sink);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_self_restarts_from_any_state() {
        for state in [
            DeferState::Initial,
            DeferState::SelfRef,
            DeferState::NewCollection,
            DeferState::CheckCast,
        ] {
            assert_eq!(
                transition(state, Step::LoadSelf),
                Action::Restart(DeferState::SelfRef)
            );
        }
    }

    #[test]
    fn store_only_continues_after_zero_push() {
        assert_eq!(
            transition(DeferState::ZeroPush, Step::StoreInt),
            Action::Defer(DeferState::SelfRef)
        );
        assert_eq!(transition(DeferState::SelfRef, Step::StoreInt), Action::Reject);
    }

    #[test]
    fn unflagged_put_field_rejects() {
        assert_eq!(
            transition(DeferState::CollectionInit, Step::PutField { suppressed: false }),
            Action::Reject
        );
        assert_eq!(
            transition(DeferState::Dup, Step::PutField { suppressed: true }),
            Action::Reject
        );
    }

    #[test]
    fn position_markers_only_after_cast() {
        assert_eq!(transition(DeferState::CollectionInit, Step::Label), Action::Reject);
        assert_eq!(
            transition(DeferState::CheckCast, Step::Label),
            Action::Defer(DeferState::CastPosition)
        );
        assert_eq!(transition(DeferState::CheckCast, Step::LineNumber), Action::Reject);
    }

    #[test]
    fn collection_types() {
        assert!(is_collection("java/util/LinkedHashSet"));
        assert!(!is_collection("java/util/LinkedList"));
        assert!(!is_collection_init("java/util/ArrayList", "<init>", "(I)V"));
    }
}
