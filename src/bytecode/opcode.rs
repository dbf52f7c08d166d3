//! Raw opcode tags
//!
//! One variant per opcode a reading front end can deliver, carrying the class-file encoding byte.
//! The positional short forms (`iload_0` … `aload_3`, `istore_0` … `astore_3`, `ldc_w`,
//! `goto_w`, `jsr_w`) normalize to their canonical opcode in [`Opcode::from_byte`], the same way
//! reading front ends expose them; the slot or constant they encode travels as an operand.

use crate::errors::{AnalysisError, Result};

/// A single stack-machine operation tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    Nop = 0,
    AConstNull = 1,
    IConstM1 = 2,
    IConst0 = 3,
    IConst1 = 4,
    IConst2 = 5,
    IConst3 = 6,
    IConst4 = 7,
    IConst5 = 8,
    LConst0 = 9,
    LConst1 = 10,
    FConst0 = 11,
    FConst1 = 12,
    FConst2 = 13,
    DConst0 = 14,
    DConst1 = 15,
    BiPush = 16,
    SiPush = 17,
    Ldc = 18,
    ILoad = 21,
    LLoad = 22,
    FLoad = 23,
    DLoad = 24,
    ALoad = 25,
    IALoad = 46,
    LALoad = 47,
    FALoad = 48,
    DALoad = 49,
    AALoad = 50,
    BALoad = 51,
    CALoad = 52,
    SALoad = 53,
    IStore = 54,
    LStore = 55,
    FStore = 56,
    DStore = 57,
    AStore = 58,
    IAStore = 79,
    LAStore = 80,
    FAStore = 81,
    DAStore = 82,
    AAStore = 83,
    BAStore = 84,
    CAStore = 85,
    SAStore = 86,
    Pop = 87,
    Pop2 = 88,
    Dup = 89,
    DupX1 = 90,
    DupX2 = 91,
    Dup2 = 92,
    Dup2X1 = 93,
    Dup2X2 = 94,
    Swap = 95,
    IAdd = 96,
    LAdd = 97,
    FAdd = 98,
    DAdd = 99,
    ISub = 100,
    LSub = 101,
    FSub = 102,
    DSub = 103,
    IMul = 104,
    LMul = 105,
    FMul = 106,
    DMul = 107,
    IDiv = 108,
    LDiv = 109,
    FDiv = 110,
    DDiv = 111,
    IRem = 112,
    LRem = 113,
    FRem = 114,
    DRem = 115,
    INeg = 116,
    LNeg = 117,
    FNeg = 118,
    DNeg = 119,
    IShl = 120,
    LShl = 121,
    IShr = 122,
    LShr = 123,
    IUShr = 124,
    LUShr = 125,
    IAnd = 126,
    LAnd = 127,
    IOr = 128,
    LOr = 129,
    IXor = 130,
    LXor = 131,
    IInc = 132,
    I2L = 133,
    I2F = 134,
    I2D = 135,
    L2I = 136,
    L2F = 137,
    L2D = 138,
    F2I = 139,
    F2L = 140,
    F2D = 141,
    D2I = 142,
    D2L = 143,
    D2F = 144,
    I2B = 145,
    I2C = 146,
    I2S = 147,
    LCmp = 148,
    FCmpL = 149,
    FCmpG = 150,
    DCmpL = 151,
    DCmpG = 152,
    IfEq = 153,
    IfNe = 154,
    IfLt = 155,
    IfGe = 156,
    IfGt = 157,
    IfLe = 158,
    IfICmpEq = 159,
    IfICmpNe = 160,
    IfICmpLt = 161,
    IfICmpGe = 162,
    IfICmpGt = 163,
    IfICmpLe = 164,
    IfACmpEq = 165,
    IfACmpNe = 166,
    Goto = 167,
    Jsr = 168,
    Ret = 169,
    TableSwitch = 170,
    LookupSwitch = 171,
    IReturn = 172,
    LReturn = 173,
    FReturn = 174,
    DReturn = 175,
    AReturn = 176,
    Return = 177,
    GetStatic = 178,
    PutStatic = 179,
    GetField = 180,
    PutField = 181,
    InvokeVirtual = 182,
    InvokeSpecial = 183,
    InvokeStatic = 184,
    InvokeInterface = 185,
    InvokeDynamic = 186,
    New = 187,
    NewArray = 188,
    ANewArray = 189,
    ArrayLength = 190,
    AThrow = 191,
    CheckCast = 192,
    InstanceOf = 193,
    MonitorEnter = 194,
    MonitorExit = 195,
    MultiANewArray = 197,
    IfNull = 198,
    IfNonNull = 199,
}

impl Opcode {
    /// Decode a class-file opcode byte, normalizing positional and wide short forms.
    ///
    /// Returns `None` for the `wide` prefix (a modifier, not an instruction of its own), the
    /// reserved debugger bytes and any gap in the instruction set.
    pub fn from_byte(byte: u8) -> Option<Opcode> {
        use Opcode::*;
        let opcode = match byte {
            0 => Nop,
            1 => AConstNull,
            2 => IConstM1,
            3 => IConst0,
            4 => IConst1,
            5 => IConst2,
            6 => IConst3,
            7 => IConst4,
            8 => IConst5,
            9 => LConst0,
            10 => LConst1,
            11 => FConst0,
            12 => FConst1,
            13 => FConst2,
            14 => DConst0,
            15 => DConst1,
            16 => BiPush,
            17 => SiPush,
            // ldc_w and ldc2_w differ only in constant-pool addressing
            18 | 19 | 20 => Ldc,
            21 => ILoad,
            22 => LLoad,
            23 => FLoad,
            24 => DLoad,
            25 => ALoad,
            26..=29 => ILoad,
            30..=33 => LLoad,
            34..=37 => FLoad,
            38..=41 => DLoad,
            42..=45 => ALoad,
            46 => IALoad,
            47 => LALoad,
            48 => FALoad,
            49 => DALoad,
            50 => AALoad,
            51 => BALoad,
            52 => CALoad,
            53 => SALoad,
            54 => IStore,
            55 => LStore,
            56 => FStore,
            57 => DStore,
            58 => AStore,
            59..=62 => IStore,
            63..=66 => LStore,
            67..=70 => FStore,
            71..=74 => DStore,
            75..=78 => AStore,
            79 => IAStore,
            80 => LAStore,
            81 => FAStore,
            82 => DAStore,
            83 => AAStore,
            84 => BAStore,
            85 => CAStore,
            86 => SAStore,
            87 => Pop,
            88 => Pop2,
            89 => Dup,
            90 => DupX1,
            91 => DupX2,
            92 => Dup2,
            93 => Dup2X1,
            94 => Dup2X2,
            95 => Swap,
            96 => IAdd,
            97 => LAdd,
            98 => FAdd,
            99 => DAdd,
            100 => ISub,
            101 => LSub,
            102 => FSub,
            103 => DSub,
            104 => IMul,
            105 => LMul,
            106 => FMul,
            107 => DMul,
            108 => IDiv,
            109 => LDiv,
            110 => FDiv,
            111 => DDiv,
            112 => IRem,
            113 => LRem,
            114 => FRem,
            115 => DRem,
            116 => INeg,
            117 => LNeg,
            118 => FNeg,
            119 => DNeg,
            120 => IShl,
            121 => LShl,
            122 => IShr,
            123 => LShr,
            124 => IUShr,
            125 => LUShr,
            126 => IAnd,
            127 => LAnd,
            128 => IOr,
            129 => LOr,
            130 => IXor,
            131 => LXor,
            132 => IInc,
            133 => I2L,
            134 => I2F,
            135 => I2D,
            136 => L2I,
            137 => L2F,
            138 => L2D,
            139 => F2I,
            140 => F2L,
            141 => F2D,
            142 => D2I,
            143 => D2L,
            144 => D2F,
            145 => I2B,
            146 => I2C,
            147 => I2S,
            148 => LCmp,
            149 => FCmpL,
            150 => FCmpG,
            151 => DCmpL,
            152 => DCmpG,
            153 => IfEq,
            154 => IfNe,
            155 => IfLt,
            156 => IfGe,
            157 => IfGt,
            158 => IfLe,
            159 => IfICmpEq,
            160 => IfICmpNe,
            161 => IfICmpLt,
            162 => IfICmpGe,
            163 => IfICmpGt,
            164 => IfICmpLe,
            165 => IfACmpEq,
            166 => IfACmpNe,
            167 => Goto,
            168 => Jsr,
            169 => Ret,
            170 => TableSwitch,
            171 => LookupSwitch,
            172 => IReturn,
            173 => LReturn,
            174 => FReturn,
            175 => DReturn,
            176 => AReturn,
            177 => Return,
            178 => GetStatic,
            179 => PutStatic,
            180 => GetField,
            181 => PutField,
            182 => InvokeVirtual,
            183 => InvokeSpecial,
            184 => InvokeStatic,
            185 => InvokeInterface,
            186 => InvokeDynamic,
            187 => New,
            188 => NewArray,
            189 => ANewArray,
            190 => ArrayLength,
            191 => AThrow,
            192 => CheckCast,
            193 => InstanceOf,
            194 => MonitorEnter,
            195 => MonitorExit,
            197 => MultiANewArray,
            198 => IfNull,
            199 => IfNonNull,
            200 => Goto,
            201 => Jsr,
            _ => return None,
        };
        Some(opcode)
    }

    /// Strict form of [`Opcode::from_byte`]: a byte with no instruction is malformed input.
    pub fn decode(byte: u8) -> Result<Opcode> {
        Opcode::from_byte(byte).ok_or(AnalysisError::UnknownOpcode(byte))
    }

    pub fn mnemonic(self) -> &'static str {
        use Opcode::*;
        match self {
            Nop => "nop",
            AConstNull => "aconst_null",
            IConstM1 => "iconst_m1",
            IConst0 => "iconst_0",
            IConst1 => "iconst_1",
            IConst2 => "iconst_2",
            IConst3 => "iconst_3",
            IConst4 => "iconst_4",
            IConst5 => "iconst_5",
            LConst0 => "lconst_0",
            LConst1 => "lconst_1",
            FConst0 => "fconst_0",
            FConst1 => "fconst_1",
            FConst2 => "fconst_2",
            DConst0 => "dconst_0",
            DConst1 => "dconst_1",
            BiPush => "bipush",
            SiPush => "sipush",
            Ldc => "ldc",
            ILoad => "iload",
            LLoad => "lload",
            FLoad => "fload",
            DLoad => "dload",
            ALoad => "aload",
            IALoad => "iaload",
            LALoad => "laload",
            FALoad => "faload",
            DALoad => "daload",
            AALoad => "aaload",
            BALoad => "baload",
            CALoad => "caload",
            SALoad => "saload",
            IStore => "istore",
            LStore => "lstore",
            FStore => "fstore",
            DStore => "dstore",
            AStore => "astore",
            IAStore => "iastore",
            LAStore => "lastore",
            FAStore => "fastore",
            DAStore => "dastore",
            AAStore => "aastore",
            BAStore => "bastore",
            CAStore => "castore",
            SAStore => "sastore",
            Pop => "pop",
            Pop2 => "pop2",
            Dup => "dup",
            DupX1 => "dup_x1",
            DupX2 => "dup_x2",
            Dup2 => "dup2",
            Dup2X1 => "dup2_x1",
            Dup2X2 => "dup2_x2",
            Swap => "swap",
            IAdd => "iadd",
            LAdd => "ladd",
            FAdd => "fadd",
            DAdd => "dadd",
            ISub => "isub",
            LSub => "lsub",
            FSub => "fsub",
            DSub => "dsub",
            IMul => "imul",
            LMul => "lmul",
            FMul => "fmul",
            DMul => "dmul",
            IDiv => "idiv",
            LDiv => "ldiv",
            FDiv => "fdiv",
            DDiv => "ddiv",
            IRem => "irem",
            LRem => "lrem",
            FRem => "frem",
            DRem => "drem",
            INeg => "ineg",
            LNeg => "lneg",
            FNeg => "fneg",
            DNeg => "dneg",
            IShl => "ishl",
            LShl => "lshl",
            IShr => "ishr",
            LShr => "lshr",
            IUShr => "iushr",
            LUShr => "lushr",
            IAnd => "iand",
            LAnd => "land",
            IOr => "ior",
            LOr => "lor",
            IXor => "ixor",
            LXor => "lxor",
            IInc => "iinc",
            I2L => "i2l",
            I2F => "i2f",
            I2D => "i2d",
            L2I => "l2i",
            L2F => "l2f",
            L2D => "l2d",
            F2I => "f2i",
            F2L => "f2l",
            F2D => "f2d",
            D2I => "d2i",
            D2L => "d2l",
            D2F => "d2f",
            I2B => "i2b",
            I2C => "i2c",
            I2S => "i2s",
            LCmp => "lcmp",
            FCmpL => "fcmpl",
            FCmpG => "fcmpg",
            DCmpL => "dcmpl",
            DCmpG => "dcmpg",
            IfEq => "ifeq",
            IfNe => "ifne",
            IfLt => "iflt",
            IfGe => "ifge",
            IfGt => "ifgt",
            IfLe => "ifle",
            IfICmpEq => "if_icmpeq",
            IfICmpNe => "if_icmpne",
            IfICmpLt => "if_icmplt",
            IfICmpGe => "if_icmpge",
            IfICmpGt => "if_icmpgt",
            IfICmpLe => "if_icmple",
            IfACmpEq => "if_acmpeq",
            IfACmpNe => "if_acmpne",
            Goto => "goto",
            Jsr => "jsr",
            Ret => "ret",
            TableSwitch => "tableswitch",
            LookupSwitch => "lookupswitch",
            IReturn => "ireturn",
            LReturn => "lreturn",
            FReturn => "freturn",
            DReturn => "dreturn",
            AReturn => "areturn",
            Return => "return",
            GetStatic => "getstatic",
            PutStatic => "putstatic",
            GetField => "getfield",
            PutField => "putfield",
            InvokeVirtual => "invokevirtual",
            InvokeSpecial => "invokespecial",
            InvokeStatic => "invokestatic",
            InvokeInterface => "invokeinterface",
            InvokeDynamic => "invokedynamic",
            New => "new",
            NewArray => "newarray",
            ANewArray => "anewarray",
            ArrayLength => "arraylength",
            AThrow => "athrow",
            CheckCast => "checkcast",
            InstanceOf => "instanceof",
            MonitorEnter => "monitorenter",
            MonitorExit => "monitorexit",
            MultiANewArray => "multianewarray",
            IfNull => "ifnull",
            IfNonNull => "ifnonnull",
        }
    }
}
