/*!
The MiniJava grammar, hand-encoded for the predictive parser.

Every [`NonTerminal`] knows its FIRST set, its FOLLOW set when it derives
ε, and the alternatives of its productions.  [`NonTerminal::expand`] picks
the single alternative whose FIRST set holds the lookahead; a nullable
nonterminal falls back to ε when the lookahead is in its FOLLOW set.  The
sets were computed by hand from the productions below and are checked
against them by the unit tests at the bottom of this file.

```text
Initial                   -> ClassList EOF
ClassList                 -> Class ClassList | ε
Class                     -> OptionalModifier class ClassId OptionalInheritance { MemberList }
OptionalModifier          -> Modifier | ε
Modifier                  -> abstract | static | final
OptionalInheritance       -> extends ClassId | ε
MemberList                -> Member MemberList | ε
Member                    -> Type RestOfMemberDeclaration
                           | Constructor
                           | Modifier MethodType metVarId RestOfMethodDeclaration
                           | void metVarId RestOfMethodDeclaration
Type                      -> PrimitiveType | ClassId
PrimitiveType             -> boolean | char | int
MethodType                -> Type | void
RestOfMemberDeclaration   -> metVarId EndOfMemberDeclaration
EndOfMemberDeclaration    -> RestOfMethodDeclaration | ;
RestOfMethodDeclaration   -> FormalArguments OptionalBlock
Constructor               -> public ClassId FormalArguments Block
FormalArguments           -> ( OptionalFormalArgumentsList )
OptionalFormalArgumentsList -> FormalArgumentsList | ε
FormalArgumentsList       -> FormalArgument RestOfFormalArgumentsList
RestOfFormalArgumentsList -> , FormalArgumentsList | ε
FormalArgument            -> Type metVarId
OptionalBlock             -> Block | ;
Block                     -> { SentenceList }
SentenceList              -> Sentence SentenceList | ε
Sentence                  -> ; | Expression ; | LocalVariable ; | Return ; | If | While | Block
LocalVariable             -> var metVarId = CompoundExpression
Return                    -> return OptionalExpression
OptionalExpression        -> Expression | ε
If                        -> if ( Expression ) Sentence OptionalElse
OptionalElse              -> else Sentence | ε
While                     -> while ( Expression ) Sentence
Expression                -> CompoundExpression RestOfExpression
RestOfExpression          -> AssignmentOperator CompoundExpression | ε
AssignmentOperator        -> =
CompoundExpression        -> BasicExpression RestOfCompoundExpression
RestOfCompoundExpression  -> BinaryOperator BasicExpression RestOfCompoundExpression | ε
BinaryOperator            -> || | && | == | != | < | > | <= | >= | + | - | * | / | %
BasicExpression           -> UnaryOperator Operand | Operand
UnaryOperator             -> + | ++ | - | -- | !
Operand                   -> Primitive | Reference
Primitive                 -> null | true | false | intLiteral | charLiteral
Reference                 -> Primary RestOfReference
RestOfReference           -> ChainedMetVar RestOfReference | ε
Primary                   -> this | stringLiteral | VarAccessOrMetCall | ConstructorCall
                           | StaticMethodCall | ParenthesizedExpression
VarAccessOrMetCall        -> metVarId RestOfOptionalMethodCall
RestOfOptionalMethodCall  -> ActualArguments | ε
ConstructorCall           -> new ClassId ActualArguments
StaticMethodCall          -> ClassId . metVarId ActualArguments
ParenthesizedExpression   -> ( Expression )
ActualArguments           -> ( OptionalExpressionList )
OptionalExpressionList    -> ExpressionList | ε
ExpressionList            -> Expression RestOfExpressionList
RestOfExpressionList      -> , ExpressionList | ε
ChainedMetVar             -> . metVarId RestOfChaining
RestOfChaining            -> ActualArguments | ε
```

`OptionalElse` is the one place where FIRST and FOLLOW overlap (`else`):
FIRST wins, which binds a dangling `else` to the nearest `if`.
*/

use std::fmt;

use crate::token::TokenKind::{self, *};

/// A grammar symbol as it sits in a right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    T(TokenKind),
    N(NonTerminal),
}

use Symbol::{N, T};

/// One alternative of a production and the terminals that select it.
#[derive(Debug)]
pub struct Alternative {
    pub first: &'static [TokenKind],
    pub rhs: &'static [Symbol],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NonTerminal {
    Initial,
    ClassList,
    Class,
    OptionalModifier,
    Modifier,
    OptionalInheritance,
    MemberList,
    Member,
    Type,
    PrimitiveType,
    MethodType,
    RestOfMemberDeclaration,
    EndOfMemberDeclaration,
    RestOfMethodDeclaration,
    Constructor,
    FormalArguments,
    OptionalFormalArgumentsList,
    FormalArgumentsList,
    RestOfFormalArgumentsList,
    FormalArgument,
    OptionalBlock,
    Block,
    SentenceList,
    Sentence,
    LocalVariable,
    Return,
    OptionalExpression,
    If,
    OptionalElse,
    While,
    Expression,
    RestOfExpression,
    AssignmentOperator,
    CompoundExpression,
    RestOfCompoundExpression,
    BinaryOperator,
    BasicExpression,
    UnaryOperator,
    Operand,
    Primitive,
    Reference,
    RestOfReference,
    Primary,
    VarAccessOrMetCall,
    RestOfOptionalMethodCall,
    ConstructorCall,
    StaticMethodCall,
    ParenthesizedExpression,
    ActualArguments,
    OptionalExpressionList,
    ExpressionList,
    RestOfExpressionList,
    ChainedMetVar,
    RestOfChaining,
}

impl fmt::Display for NonTerminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FIRST sets
// ─────────────────────────────────────────────────────────────────────────────

const MODIFIERS: &[TokenKind] = &[ABSTRACT, STATIC, FINAL];
const PRIMITIVE_TYPES: &[TokenKind] = &[BOOLEAN, CHAR, INT];
const TYPES: &[TokenKind] = &[BOOLEAN, CHAR, INT, CLASS_IDENTIFIER];
const METHOD_TYPES: &[TokenKind] = &[BOOLEAN, CHAR, INT, CLASS_IDENTIFIER, VOID];
const CLASSES: &[TokenKind] = &[ABSTRACT, STATIC, FINAL, CLASS];
const INITIAL: &[TokenKind] = &[ABSTRACT, STATIC, FINAL, CLASS, EOF];
const MEMBERS: &[TokenKind] = &[
    BOOLEAN,
    CHAR,
    INT,
    CLASS_IDENTIFIER,
    PUBLIC,
    ABSTRACT,
    STATIC,
    FINAL,
    VOID,
];
const END_OF_MEMBER: &[TokenKind] = &[LEFT_BRACKET, SEMICOLON];
const OPTIONAL_BLOCKS: &[TokenKind] = &[LEFT_CURLY_BRACKET, SEMICOLON];
const BINARY_OPERATORS: &[TokenKind] = &[
    OR,
    AND,
    EQUALS,
    DIFFERENT,
    LESS_THAN,
    GREATER_THAN,
    LESS_THAN_OR_EQUAL,
    GREATER_THAN_OR_EQUAL,
    ADDITION,
    SUBTRACTION,
    MULTIPLICATION,
    DIVISION,
    MODULUS,
];
const UNARY_OPERATORS: &[TokenKind] = &[ADDITION, INCREMENT, SUBTRACTION, DECREMENT, NOT];
const PRIMITIVES: &[TokenKind] = &[NULL, TRUE, FALSE, INTEGER_LITERAL, CHAR_LITERAL];
const PRIMARIES: &[TokenKind] = &[
    THIS,
    STRING_LITERAL,
    MET_VAR_IDENTIFIER,
    NEW,
    CLASS_IDENTIFIER,
    LEFT_BRACKET,
];
const OPERANDS: &[TokenKind] = &[
    NULL,
    TRUE,
    FALSE,
    INTEGER_LITERAL,
    CHAR_LITERAL,
    THIS,
    STRING_LITERAL,
    MET_VAR_IDENTIFIER,
    NEW,
    CLASS_IDENTIFIER,
    LEFT_BRACKET,
];
const EXPRESSIONS: &[TokenKind] = &[
    ADDITION,
    INCREMENT,
    SUBTRACTION,
    DECREMENT,
    NOT,
    NULL,
    TRUE,
    FALSE,
    INTEGER_LITERAL,
    CHAR_LITERAL,
    THIS,
    STRING_LITERAL,
    MET_VAR_IDENTIFIER,
    NEW,
    CLASS_IDENTIFIER,
    LEFT_BRACKET,
];
const SENTENCES: &[TokenKind] = &[
    SEMICOLON,
    VAR,
    RETURN,
    IF,
    WHILE,
    LEFT_CURLY_BRACKET,
    ADDITION,
    INCREMENT,
    SUBTRACTION,
    DECREMENT,
    NOT,
    NULL,
    TRUE,
    FALSE,
    INTEGER_LITERAL,
    CHAR_LITERAL,
    THIS,
    STRING_LITERAL,
    MET_VAR_IDENTIFIER,
    NEW,
    CLASS_IDENTIFIER,
    LEFT_BRACKET,
];

// ─────────────────────────────────────────────────────────────────────────────
// FOLLOW sets (nullable nonterminals only)
// ─────────────────────────────────────────────────────────────────────────────

const FOLLOW_EXPRESSION: &[TokenKind] = &[SEMICOLON, RIGHT_BRACKET, COMMA];
const FOLLOW_COMPOUND: &[TokenKind] = &[SEMICOLON, RIGHT_BRACKET, COMMA, ASSIGNMENT];
const FOLLOW_REFERENCE: &[TokenKind] = &[
    OR,
    AND,
    EQUALS,
    DIFFERENT,
    LESS_THAN,
    GREATER_THAN,
    LESS_THAN_OR_EQUAL,
    GREATER_THAN_OR_EQUAL,
    ADDITION,
    SUBTRACTION,
    MULTIPLICATION,
    DIVISION,
    MODULUS,
    SEMICOLON,
    RIGHT_BRACKET,
    COMMA,
    ASSIGNMENT,
];
const FOLLOW_PRIMARY: &[TokenKind] = &[
    DOT,
    OR,
    AND,
    EQUALS,
    DIFFERENT,
    LESS_THAN,
    GREATER_THAN,
    LESS_THAN_OR_EQUAL,
    GREATER_THAN_OR_EQUAL,
    ADDITION,
    SUBTRACTION,
    MULTIPLICATION,
    DIVISION,
    MODULUS,
    SEMICOLON,
    RIGHT_BRACKET,
    COMMA,
    ASSIGNMENT,
];
const FOLLOW_SENTENCE: &[TokenKind] = &[
    ELSE,
    RIGHT_CURLY_BRACKET,
    SEMICOLON,
    VAR,
    RETURN,
    IF,
    WHILE,
    LEFT_CURLY_BRACKET,
    ADDITION,
    INCREMENT,
    SUBTRACTION,
    DECREMENT,
    NOT,
    NULL,
    TRUE,
    FALSE,
    INTEGER_LITERAL,
    CHAR_LITERAL,
    THIS,
    STRING_LITERAL,
    MET_VAR_IDENTIFIER,
    NEW,
    CLASS_IDENTIFIER,
    LEFT_BRACKET,
];

impl NonTerminal {
    /// Terminals that can begin a derivation of this nonterminal.
    pub const fn first(self) -> &'static [TokenKind] {
        use NonTerminal::*;

        match self {
            Initial => INITIAL,
            ClassList | Class => CLASSES,
            OptionalModifier | Modifier => MODIFIERS,
            OptionalInheritance => &[EXTENDS],
            MemberList | Member => MEMBERS,
            Type | FormalArgument | FormalArgumentsList | OptionalFormalArgumentsList => TYPES,
            PrimitiveType => PRIMITIVE_TYPES,
            MethodType => METHOD_TYPES,
            RestOfMemberDeclaration => &[MET_VAR_IDENTIFIER],
            EndOfMemberDeclaration => END_OF_MEMBER,
            RestOfMethodDeclaration | FormalArguments => &[LEFT_BRACKET],
            Constructor => &[PUBLIC],
            RestOfFormalArgumentsList => &[COMMA],
            OptionalBlock => OPTIONAL_BLOCKS,
            Block => &[LEFT_CURLY_BRACKET],
            SentenceList | Sentence => SENTENCES,
            LocalVariable => &[VAR],
            Return => &[RETURN],
            OptionalExpression
            | Expression
            | CompoundExpression
            | BasicExpression
            | ExpressionList
            | OptionalExpressionList => EXPRESSIONS,
            If => &[IF],
            OptionalElse => &[ELSE],
            While => &[WHILE],
            RestOfExpression | AssignmentOperator => &[ASSIGNMENT],
            RestOfCompoundExpression | BinaryOperator => BINARY_OPERATORS,
            UnaryOperator => UNARY_OPERATORS,
            Operand => OPERANDS,
            Primitive => PRIMITIVES,
            Reference | Primary => PRIMARIES,
            RestOfReference | ChainedMetVar => &[DOT],
            VarAccessOrMetCall => &[MET_VAR_IDENTIFIER],
            RestOfOptionalMethodCall | ActualArguments | ParenthesizedExpression | RestOfChaining => {
                &[LEFT_BRACKET]
            }
            ConstructorCall => &[NEW],
            StaticMethodCall => &[CLASS_IDENTIFIER],
            RestOfExpressionList => &[COMMA],
        }
    }

    /// FOLLOW set of a nullable nonterminal; empty for the others.
    pub const fn follow(self) -> &'static [TokenKind] {
        use NonTerminal::*;

        match self {
            ClassList => &[EOF],
            OptionalModifier => &[CLASS],
            OptionalInheritance => &[LEFT_CURLY_BRACKET],
            MemberList | SentenceList => &[RIGHT_CURLY_BRACKET],
            OptionalFormalArgumentsList
            | RestOfFormalArgumentsList
            | OptionalExpressionList
            | RestOfExpressionList => &[RIGHT_BRACKET],
            OptionalExpression => &[SEMICOLON],
            OptionalElse => FOLLOW_SENTENCE,
            RestOfExpression => FOLLOW_EXPRESSION,
            RestOfCompoundExpression => FOLLOW_COMPOUND,
            RestOfReference => FOLLOW_REFERENCE,
            RestOfOptionalMethodCall | RestOfChaining => FOLLOW_PRIMARY,
            _ => &[],
        }
    }

    /// Whether the nonterminal derives ε.
    pub const fn nullable(self) -> bool {
        !self.follow().is_empty()
    }

    /// Every terminal the nonterminal accepts as lookahead.
    pub fn expected(self) -> Vec<TokenKind> {
        let mut expected = self.first().to_vec();

        for kind in self.follow() {
            if !expected.contains(kind) {
                expected.push(*kind);
            }
        }

        expected
    }

    /// The non-ε alternatives, each with the terminals that select it.
    pub const fn alternatives(self) -> &'static [Alternative] {
        use NonTerminal::*;

        match self {
            Initial => &[Alternative {
                first: INITIAL,
                rhs: &[N(ClassList), T(EOF)],
            }],
            ClassList => &[Alternative {
                first: CLASSES,
                rhs: &[N(Class), N(ClassList)],
            }],
            Class => &[Alternative {
                first: CLASSES,
                rhs: &[
                    N(OptionalModifier),
                    T(CLASS),
                    T(CLASS_IDENTIFIER),
                    N(OptionalInheritance),
                    T(LEFT_CURLY_BRACKET),
                    N(MemberList),
                    T(RIGHT_CURLY_BRACKET),
                ],
            }],
            OptionalModifier => &[Alternative {
                first: MODIFIERS,
                rhs: &[N(Modifier)],
            }],
            Modifier => &[
                Alternative {
                    first: &[ABSTRACT],
                    rhs: &[T(ABSTRACT)],
                },
                Alternative {
                    first: &[STATIC],
                    rhs: &[T(STATIC)],
                },
                Alternative {
                    first: &[FINAL],
                    rhs: &[T(FINAL)],
                },
            ],
            OptionalInheritance => &[Alternative {
                first: &[EXTENDS],
                rhs: &[T(EXTENDS), T(CLASS_IDENTIFIER)],
            }],
            MemberList => &[Alternative {
                first: MEMBERS,
                rhs: &[N(Member), N(MemberList)],
            }],
            Member => &[
                Alternative {
                    first: TYPES,
                    rhs: &[N(Type), N(RestOfMemberDeclaration)],
                },
                Alternative {
                    first: &[PUBLIC],
                    rhs: &[N(Constructor)],
                },
                Alternative {
                    first: MODIFIERS,
                    rhs: &[
                        N(Modifier),
                        N(MethodType),
                        T(MET_VAR_IDENTIFIER),
                        N(RestOfMethodDeclaration),
                    ],
                },
                Alternative {
                    first: &[VOID],
                    rhs: &[T(VOID), T(MET_VAR_IDENTIFIER), N(RestOfMethodDeclaration)],
                },
            ],
            Type => &[
                Alternative {
                    first: PRIMITIVE_TYPES,
                    rhs: &[N(PrimitiveType)],
                },
                Alternative {
                    first: &[CLASS_IDENTIFIER],
                    rhs: &[T(CLASS_IDENTIFIER)],
                },
            ],
            PrimitiveType => &[
                Alternative {
                    first: &[BOOLEAN],
                    rhs: &[T(BOOLEAN)],
                },
                Alternative {
                    first: &[CHAR],
                    rhs: &[T(CHAR)],
                },
                Alternative {
                    first: &[INT],
                    rhs: &[T(INT)],
                },
            ],
            MethodType => &[
                Alternative {
                    first: TYPES,
                    rhs: &[N(Type)],
                },
                Alternative {
                    first: &[VOID],
                    rhs: &[T(VOID)],
                },
            ],
            RestOfMemberDeclaration => &[Alternative {
                first: &[MET_VAR_IDENTIFIER],
                rhs: &[T(MET_VAR_IDENTIFIER), N(EndOfMemberDeclaration)],
            }],
            EndOfMemberDeclaration => &[
                Alternative {
                    first: &[LEFT_BRACKET],
                    rhs: &[N(RestOfMethodDeclaration)],
                },
                Alternative {
                    first: &[SEMICOLON],
                    rhs: &[T(SEMICOLON)],
                },
            ],
            RestOfMethodDeclaration => &[Alternative {
                first: &[LEFT_BRACKET],
                rhs: &[N(FormalArguments), N(OptionalBlock)],
            }],
            Constructor => &[Alternative {
                first: &[PUBLIC],
                rhs: &[T(PUBLIC), T(CLASS_IDENTIFIER), N(FormalArguments), N(Block)],
            }],
            FormalArguments => &[Alternative {
                first: &[LEFT_BRACKET],
                rhs: &[
                    T(LEFT_BRACKET),
                    N(OptionalFormalArgumentsList),
                    T(RIGHT_BRACKET),
                ],
            }],
            OptionalFormalArgumentsList => &[Alternative {
                first: TYPES,
                rhs: &[N(FormalArgumentsList)],
            }],
            FormalArgumentsList => &[Alternative {
                first: TYPES,
                rhs: &[N(FormalArgument), N(RestOfFormalArgumentsList)],
            }],
            RestOfFormalArgumentsList => &[Alternative {
                first: &[COMMA],
                rhs: &[T(COMMA), N(FormalArgumentsList)],
            }],
            FormalArgument => &[Alternative {
                first: TYPES,
                rhs: &[N(Type), T(MET_VAR_IDENTIFIER)],
            }],
            OptionalBlock => &[
                Alternative {
                    first: &[LEFT_CURLY_BRACKET],
                    rhs: &[N(Block)],
                },
                Alternative {
                    first: &[SEMICOLON],
                    rhs: &[T(SEMICOLON)],
                },
            ],
            Block => &[Alternative {
                first: &[LEFT_CURLY_BRACKET],
                rhs: &[
                    T(LEFT_CURLY_BRACKET),
                    N(SentenceList),
                    T(RIGHT_CURLY_BRACKET),
                ],
            }],
            SentenceList => &[Alternative {
                first: SENTENCES,
                rhs: &[N(Sentence), N(SentenceList)],
            }],
            Sentence => &[
                Alternative {
                    first: &[SEMICOLON],
                    rhs: &[T(SEMICOLON)],
                },
                Alternative {
                    first: EXPRESSIONS,
                    rhs: &[N(Expression), T(SEMICOLON)],
                },
                Alternative {
                    first: &[VAR],
                    rhs: &[N(LocalVariable), T(SEMICOLON)],
                },
                Alternative {
                    first: &[RETURN],
                    rhs: &[N(Return), T(SEMICOLON)],
                },
                Alternative {
                    first: &[IF],
                    rhs: &[N(If)],
                },
                Alternative {
                    first: &[WHILE],
                    rhs: &[N(While)],
                },
                Alternative {
                    first: &[LEFT_CURLY_BRACKET],
                    rhs: &[N(Block)],
                },
            ],
            LocalVariable => &[Alternative {
                first: &[VAR],
                rhs: &[
                    T(VAR),
                    T(MET_VAR_IDENTIFIER),
                    T(ASSIGNMENT),
                    N(CompoundExpression),
                ],
            }],
            Return => &[Alternative {
                first: &[RETURN],
                rhs: &[T(RETURN), N(OptionalExpression)],
            }],
            OptionalExpression => &[Alternative {
                first: EXPRESSIONS,
                rhs: &[N(Expression)],
            }],
            If => &[Alternative {
                first: &[IF],
                rhs: &[
                    T(IF),
                    T(LEFT_BRACKET),
                    N(Expression),
                    T(RIGHT_BRACKET),
                    N(Sentence),
                    N(OptionalElse),
                ],
            }],
            OptionalElse => &[Alternative {
                first: &[ELSE],
                rhs: &[T(ELSE), N(Sentence)],
            }],
            While => &[Alternative {
                first: &[WHILE],
                rhs: &[
                    T(WHILE),
                    T(LEFT_BRACKET),
                    N(Expression),
                    T(RIGHT_BRACKET),
                    N(Sentence),
                ],
            }],
            Expression => &[Alternative {
                first: EXPRESSIONS,
                rhs: &[N(CompoundExpression), N(RestOfExpression)],
            }],
            RestOfExpression => &[Alternative {
                first: &[ASSIGNMENT],
                rhs: &[N(AssignmentOperator), N(CompoundExpression)],
            }],
            AssignmentOperator => &[Alternative {
                first: &[ASSIGNMENT],
                rhs: &[T(ASSIGNMENT)],
            }],
            CompoundExpression => &[Alternative {
                first: EXPRESSIONS,
                rhs: &[N(BasicExpression), N(RestOfCompoundExpression)],
            }],
            RestOfCompoundExpression => &[Alternative {
                first: BINARY_OPERATORS,
                rhs: &[
                    N(BinaryOperator),
                    N(BasicExpression),
                    N(RestOfCompoundExpression),
                ],
            }],
            BinaryOperator => &[
                Alternative {
                    first: &[OR],
                    rhs: &[T(OR)],
                },
                Alternative {
                    first: &[AND],
                    rhs: &[T(AND)],
                },
                Alternative {
                    first: &[EQUALS],
                    rhs: &[T(EQUALS)],
                },
                Alternative {
                    first: &[DIFFERENT],
                    rhs: &[T(DIFFERENT)],
                },
                Alternative {
                    first: &[LESS_THAN],
                    rhs: &[T(LESS_THAN)],
                },
                Alternative {
                    first: &[GREATER_THAN],
                    rhs: &[T(GREATER_THAN)],
                },
                Alternative {
                    first: &[LESS_THAN_OR_EQUAL],
                    rhs: &[T(LESS_THAN_OR_EQUAL)],
                },
                Alternative {
                    first: &[GREATER_THAN_OR_EQUAL],
                    rhs: &[T(GREATER_THAN_OR_EQUAL)],
                },
                Alternative {
                    first: &[ADDITION],
                    rhs: &[T(ADDITION)],
                },
                Alternative {
                    first: &[SUBTRACTION],
                    rhs: &[T(SUBTRACTION)],
                },
                Alternative {
                    first: &[MULTIPLICATION],
                    rhs: &[T(MULTIPLICATION)],
                },
                Alternative {
                    first: &[DIVISION],
                    rhs: &[T(DIVISION)],
                },
                Alternative {
                    first: &[MODULUS],
                    rhs: &[T(MODULUS)],
                },
            ],
            BasicExpression => &[
                Alternative {
                    first: UNARY_OPERATORS,
                    rhs: &[N(UnaryOperator), N(Operand)],
                },
                Alternative {
                    first: OPERANDS,
                    rhs: &[N(Operand)],
                },
            ],
            UnaryOperator => &[
                Alternative {
                    first: &[ADDITION],
                    rhs: &[T(ADDITION)],
                },
                Alternative {
                    first: &[INCREMENT],
                    rhs: &[T(INCREMENT)],
                },
                Alternative {
                    first: &[SUBTRACTION],
                    rhs: &[T(SUBTRACTION)],
                },
                Alternative {
                    first: &[DECREMENT],
                    rhs: &[T(DECREMENT)],
                },
                Alternative {
                    first: &[NOT],
                    rhs: &[T(NOT)],
                },
            ],
            Operand => &[
                Alternative {
                    first: PRIMITIVES,
                    rhs: &[N(Primitive)],
                },
                Alternative {
                    first: PRIMARIES,
                    rhs: &[N(Reference)],
                },
            ],
            Primitive => &[
                Alternative {
                    first: &[NULL],
                    rhs: &[T(NULL)],
                },
                Alternative {
                    first: &[TRUE],
                    rhs: &[T(TRUE)],
                },
                Alternative {
                    first: &[FALSE],
                    rhs: &[T(FALSE)],
                },
                Alternative {
                    first: &[INTEGER_LITERAL],
                    rhs: &[T(INTEGER_LITERAL)],
                },
                Alternative {
                    first: &[CHAR_LITERAL],
                    rhs: &[T(CHAR_LITERAL)],
                },
            ],
            Reference => &[Alternative {
                first: PRIMARIES,
                rhs: &[N(Primary), N(RestOfReference)],
            }],
            RestOfReference => &[Alternative {
                first: &[DOT],
                rhs: &[N(ChainedMetVar), N(RestOfReference)],
            }],
            Primary => &[
                Alternative {
                    first: &[THIS],
                    rhs: &[T(THIS)],
                },
                Alternative {
                    first: &[STRING_LITERAL],
                    rhs: &[T(STRING_LITERAL)],
                },
                Alternative {
                    first: &[MET_VAR_IDENTIFIER],
                    rhs: &[N(VarAccessOrMetCall)],
                },
                Alternative {
                    first: &[NEW],
                    rhs: &[N(ConstructorCall)],
                },
                Alternative {
                    first: &[CLASS_IDENTIFIER],
                    rhs: &[N(StaticMethodCall)],
                },
                Alternative {
                    first: &[LEFT_BRACKET],
                    rhs: &[N(ParenthesizedExpression)],
                },
            ],
            VarAccessOrMetCall => &[Alternative {
                first: &[MET_VAR_IDENTIFIER],
                rhs: &[T(MET_VAR_IDENTIFIER), N(RestOfOptionalMethodCall)],
            }],
            RestOfOptionalMethodCall | RestOfChaining => &[Alternative {
                first: &[LEFT_BRACKET],
                rhs: &[N(ActualArguments)],
            }],
            ConstructorCall => &[Alternative {
                first: &[NEW],
                rhs: &[T(NEW), T(CLASS_IDENTIFIER), N(ActualArguments)],
            }],
            StaticMethodCall => &[Alternative {
                first: &[CLASS_IDENTIFIER],
                rhs: &[
                    T(CLASS_IDENTIFIER),
                    T(DOT),
                    T(MET_VAR_IDENTIFIER),
                    N(ActualArguments),
                ],
            }],
            ParenthesizedExpression => &[Alternative {
                first: &[LEFT_BRACKET],
                rhs: &[T(LEFT_BRACKET), N(Expression), T(RIGHT_BRACKET)],
            }],
            ActualArguments => &[Alternative {
                first: &[LEFT_BRACKET],
                rhs: &[
                    T(LEFT_BRACKET),
                    N(OptionalExpressionList),
                    T(RIGHT_BRACKET),
                ],
            }],
            OptionalExpressionList => &[Alternative {
                first: EXPRESSIONS,
                rhs: &[N(ExpressionList)],
            }],
            ExpressionList => &[Alternative {
                first: EXPRESSIONS,
                rhs: &[N(Expression), N(RestOfExpressionList)],
            }],
            RestOfExpressionList => &[Alternative {
                first: &[COMMA],
                rhs: &[T(COMMA), N(ExpressionList)],
            }],
            ChainedMetVar => &[Alternative {
                first: &[DOT],
                rhs: &[T(DOT), T(MET_VAR_IDENTIFIER), N(RestOfChaining)],
            }],
        }
    }

    /// Right-hand side to push for `lookahead`, or `None` when no production
    /// of this nonterminal accepts it.  ε is the empty slice.
    pub fn expand(self, lookahead: TokenKind) -> Option<&'static [Symbol]> {
        for alternative in self.alternatives() {
            if alternative.first.contains(&lookahead) {
                return Some(alternative.rhs);
            }
        }

        if self.follow().contains(&lookahead) {
            return Some(&[]);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const ALL: &[NonTerminal] = &[
        NonTerminal::Initial,
        NonTerminal::ClassList,
        NonTerminal::Class,
        NonTerminal::OptionalModifier,
        NonTerminal::Modifier,
        NonTerminal::OptionalInheritance,
        NonTerminal::MemberList,
        NonTerminal::Member,
        NonTerminal::Type,
        NonTerminal::PrimitiveType,
        NonTerminal::MethodType,
        NonTerminal::RestOfMemberDeclaration,
        NonTerminal::EndOfMemberDeclaration,
        NonTerminal::RestOfMethodDeclaration,
        NonTerminal::Constructor,
        NonTerminal::FormalArguments,
        NonTerminal::OptionalFormalArgumentsList,
        NonTerminal::FormalArgumentsList,
        NonTerminal::RestOfFormalArgumentsList,
        NonTerminal::FormalArgument,
        NonTerminal::OptionalBlock,
        NonTerminal::Block,
        NonTerminal::SentenceList,
        NonTerminal::Sentence,
        NonTerminal::LocalVariable,
        NonTerminal::Return,
        NonTerminal::OptionalExpression,
        NonTerminal::If,
        NonTerminal::OptionalElse,
        NonTerminal::While,
        NonTerminal::Expression,
        NonTerminal::RestOfExpression,
        NonTerminal::AssignmentOperator,
        NonTerminal::CompoundExpression,
        NonTerminal::RestOfCompoundExpression,
        NonTerminal::BinaryOperator,
        NonTerminal::BasicExpression,
        NonTerminal::UnaryOperator,
        NonTerminal::Operand,
        NonTerminal::Primitive,
        NonTerminal::Reference,
        NonTerminal::RestOfReference,
        NonTerminal::Primary,
        NonTerminal::VarAccessOrMetCall,
        NonTerminal::RestOfOptionalMethodCall,
        NonTerminal::ConstructorCall,
        NonTerminal::StaticMethodCall,
        NonTerminal::ParenthesizedExpression,
        NonTerminal::ActualArguments,
        NonTerminal::OptionalExpressionList,
        NonTerminal::ExpressionList,
        NonTerminal::RestOfExpressionList,
        NonTerminal::ChainedMetVar,
        NonTerminal::RestOfChaining,
    ];

    /// FIRST of a symbol string, and whether the whole string derives ε.
    fn first_of(symbols: &[Symbol]) -> (HashSet<TokenKind>, bool) {
        let mut out = HashSet::new();

        for symbol in symbols {
            match symbol {
                Symbol::T(kind) => {
                    out.insert(*kind);
                    return (out, false);
                }
                Symbol::N(nt) => {
                    out.extend(nt.first().iter().copied());
                    if !nt.nullable() {
                        return (out, false);
                    }
                }
            }
        }

        (out, true)
    }

    #[test]
    fn first_sets_match_the_productions() {
        for nt in ALL {
            let mut union = HashSet::new();

            for alternative in nt.alternatives() {
                let (computed, _) = first_of(alternative.rhs);
                let declared: HashSet<_> = alternative.first.iter().copied().collect();

                assert_eq!(computed, declared, "alternative of {:?}", nt);
                union.extend(declared);
            }

            let first: HashSet<_> = nt.first().iter().copied().collect();
            assert_eq!(union, first, "FIRST({:?})", nt);
        }
    }

    #[test]
    fn alternatives_are_disjoint() {
        for nt in ALL {
            let mut seen = HashSet::new();

            for alternative in nt.alternatives() {
                for kind in alternative.first {
                    assert!(seen.insert(*kind), "{:?} is ambiguous on {:?}", nt, kind);
                }
            }

            if *nt != NonTerminal::OptionalElse {
                for kind in nt.follow() {
                    assert!(!seen.contains(kind), "{:?} FIRST/FOLLOW clash on {:?}", nt, kind);
                }
            }
        }
    }

    #[test]
    fn nullable_nonterminals_have_a_follow_set() {
        let nullable: Vec<_> = ALL.iter().filter(|nt| nt.nullable()).collect();

        assert_eq!(nullable.len(), 16);
        assert!(!NonTerminal::Initial.nullable());
        assert!(NonTerminal::RestOfChaining.nullable());
    }

    #[test]
    fn dangling_else_takes_the_else_branch() {
        let rhs = NonTerminal::OptionalElse.expand(TokenKind::ELSE).unwrap();

        assert_eq!(rhs.first(), Some(&Symbol::T(TokenKind::ELSE)));
        assert_eq!(NonTerminal::OptionalElse.expand(TokenKind::RIGHT_CURLY_BRACKET), Some(&[][..]));
    }

    #[test]
    fn no_production_for_unexpected_lookahead() {
        assert_eq!(NonTerminal::Member.expand(TokenKind::IF), None);
        assert_eq!(NonTerminal::Block.expand(TokenKind::SEMICOLON), None);
    }
}
